//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the SQL in `migrations/` exactly; Diesel uses them for
//! type-safe query generation. Regenerate with `diesel print-schema` after a
//! migration changes the shape.

diesel::table! {
    /// Individual user accounts; unique on email.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        phone -> Varchar,
        blood_group -> Nullable<Varchar>,
        role -> Varchar,
        is_donor -> Bool,
        is_available -> Bool,
        /// Postal address document.
        address -> Nullable<Jsonb>,
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        provider_id -> Nullable<Varchar>,
        photo_url -> Nullable<Varchar>,
        /// Donor questionnaire document.
        donor_profile -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blood-bank accounts; unique on email and on licence number,
    /// independently of the users table.
    blood_banks (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        phone -> Varchar,
        license_number -> Varchar,
        registration_number -> Nullable<Varchar>,
        established_year -> Nullable<Int4>,
        address -> Nullable<Jsonb>,
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        /// Per-group stock levels document.
        inventory -> Jsonb,
        operating_hours -> Jsonb,
        is_active -> Bool,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blood requests; never deleted, status transitions via conditional
    /// update only.
    blood_requests (id) {
        id -> Uuid,
        requested_by -> Uuid,
        patient_name -> Varchar,
        blood_group -> Varchar,
        units -> Int4,
        urgency -> Varchar,
        hospital -> Varchar,
        contact_number -> Varchar,
        required_by -> Timestamptz,
        description -> Nullable<Text>,
        blood_bank -> Nullable<Uuid>,
        status -> Varchar,
        /// Structured bank response document.
        bank_response -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Donation camps with embedded registration snapshots.
    donation_camps (id) {
        id -> Uuid,
        organizer -> Uuid,
        organizer_name -> Varchar,
        name -> Varchar,
        date -> Timestamptz,
        start_time -> Varchar,
        end_time -> Varchar,
        venue -> Varchar,
        address -> Varchar,
        city -> Varchar,
        state -> Varchar,
        pincode -> Varchar,
        target_units -> Int4,
        collected_units -> Int4,
        description -> Nullable<Text>,
        contact_phone -> Nullable<Varchar>,
        contact_email -> Nullable<Varchar>,
        status -> Varchar,
        /// Registered donor snapshots document.
        registered_donors -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blood_requests -> users (requested_by));
diesel::joinable!(donation_camps -> blood_banks (organizer));

diesel::allow_tables_to_appear_in_same_query!(users, blood_banks, blood_requests, donation_camps);
