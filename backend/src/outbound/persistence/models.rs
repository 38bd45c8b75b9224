//! Row structs bridging Diesel and the domain aggregates.
//!
//! Scalar columns map one-to-one; document-shaped values (addresses,
//! questionnaires, inventory, registrations) travel as jsonb through the
//! domain types' own serde forms. Conversion failures surface as strings and
//! are wrapped into store query errors by the repositories.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::auth::EmailAddress;
use crate::domain::blood_bank::{BloodBankAccount, Inventory, OperatingHours};
use crate::domain::camp::{CampRegistration, CampStatus, DonationCamp};
use crate::domain::ids::{BankId, CampId, RequestId, UserId};
use crate::domain::password::PasswordHash;
use crate::domain::request::{BankResponse, BloodRequest, RequestStatus, Urgency};
use crate::domain::user::{Address, DonorProfile, Role, UserAccount};
use crate::domain::{BloodGroup, GeoPoint};

use super::schema::{blood_banks, blood_requests, donation_camps, users};

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw {
        "user" => Ok(Role::User),
        "donor" => Ok(Role::Donor),
        "admin" => Ok(Role::Admin),
        other => Err(format!("unrecognised role {other:?}")),
    }
}

fn parse_urgency(raw: &str) -> Result<Urgency, String> {
    match raw {
        "critical" => Ok(Urgency::Critical),
        "urgent" => Ok(Urgency::Urgent),
        "normal" => Ok(Urgency::Normal),
        other => Err(format!("unrecognised urgency {other:?}")),
    }
}

fn encode<T: serde::Serialize>(value: &T, field: &str) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|err| format!("serialise {field}: {err}"))
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, field: &str) -> Result<T, String> {
    serde_json::from_value(value).map_err(|err| format!("decode {field}: {err}"))
}

fn point_from(longitude: Option<f64>, latitude: Option<f64>) -> Option<GeoPoint> {
    match (longitude, latitude) {
        (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
        _ => None,
    }
}

/// `users` table row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub blood_group: Option<String>,
    pub role: String,
    pub is_donor: bool,
    pub is_available: bool,
    pub address: Option<Value>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub provider_id: Option<String>,
    pub photo_url: Option<String>,
    pub donor_profile: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Flatten a domain account into its storable row.
    pub fn from_domain(user: &UserAccount) -> Result<Self, String> {
        Ok(Self {
            id: *user.id.as_uuid(),
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            password_hash: user.password_hash.expose().to_owned(),
            phone: user.phone.clone(),
            blood_group: user.blood_group.map(|group| group.as_str().to_owned()),
            role: user.role.as_str().to_owned(),
            is_donor: user.is_donor,
            is_available: user.is_available,
            address: user
                .address
                .as_ref()
                .map(|address| encode(address, "address"))
                .transpose()?,
            longitude: user.location.map(|point| point.longitude),
            latitude: user.location.map(|point| point.latitude),
            provider_id: user.provider_id.clone(),
            photo_url: user.photo_url.clone(),
            donor_profile: user
                .donor_profile
                .as_ref()
                .map(|profile| encode(profile, "donor_profile"))
                .transpose()?,
            created_at: user.created_at,
        })
    }

    /// Rebuild the domain account from a stored row.
    pub fn into_domain(self) -> Result<UserAccount, String> {
        let Self {
            id,
            name,
            email,
            password_hash,
            phone,
            blood_group,
            role,
            is_donor,
            is_available,
            address,
            longitude,
            latitude,
            provider_id,
            photo_url,
            donor_profile,
            created_at,
        } = self;
        Ok(UserAccount {
            id: UserId::from_uuid(id),
            name,
            email: EmailAddress::new(&email).map_err(|err| format!("stored email: {err}"))?,
            password_hash: PasswordHash::from_stored(password_hash),
            phone,
            blood_group: blood_group
                .as_deref()
                .map(str::parse::<BloodGroup>)
                .transpose()
                .map_err(|err| err.to_string())?,
            role: parse_role(&role)?,
            is_donor,
            is_available,
            address: address
                .map(|value| decode::<Address>(value, "address"))
                .transpose()?,
            location: point_from(longitude, latitude),
            provider_id,
            photo_url,
            donor_profile: donor_profile
                .map(|value| decode::<DonorProfile>(value, "donor_profile"))
                .transpose()?,
            created_at,
        })
    }
}

/// `blood_banks` table row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = blood_banks)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BankRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub license_number: String,
    pub registration_number: Option<String>,
    pub established_year: Option<i32>,
    pub address: Option<Value>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub inventory: Value,
    pub operating_hours: Value,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl BankRow {
    /// Flatten a domain bank into its storable row.
    pub fn from_domain(bank: &BloodBankAccount) -> Result<Self, String> {
        Ok(Self {
            id: *bank.id.as_uuid(),
            name: bank.name.clone(),
            email: bank.email.as_str().to_owned(),
            password_hash: bank.password_hash.expose().to_owned(),
            phone: bank.phone.clone(),
            license_number: bank.license_number.clone(),
            registration_number: bank.registration_number.clone(),
            established_year: bank.established_year,
            address: bank
                .address
                .as_ref()
                .map(|address| encode(address, "address"))
                .transpose()?,
            longitude: bank.location.map(|point| point.longitude),
            latitude: bank.location.map(|point| point.latitude),
            inventory: encode(&bank.inventory, "inventory")?,
            operating_hours: encode(&bank.operating_hours, "operating_hours")?,
            is_active: bank.is_active,
            is_verified: bank.is_verified,
            created_at: bank.created_at,
        })
    }

    /// Rebuild the domain bank from a stored row.
    pub fn into_domain(self) -> Result<BloodBankAccount, String> {
        let Self {
            id,
            name,
            email,
            password_hash,
            phone,
            license_number,
            registration_number,
            established_year,
            address,
            longitude,
            latitude,
            inventory,
            operating_hours,
            is_active,
            is_verified,
            created_at,
        } = self;
        Ok(BloodBankAccount {
            id: BankId::from_uuid(id),
            name,
            email: EmailAddress::new(&email).map_err(|err| format!("stored email: {err}"))?,
            password_hash: PasswordHash::from_stored(password_hash),
            phone,
            license_number,
            registration_number,
            established_year,
            address: address
                .map(|value| decode::<Address>(value, "address"))
                .transpose()?,
            location: point_from(longitude, latitude),
            inventory: decode::<Inventory>(inventory, "inventory")?,
            operating_hours: decode::<OperatingHours>(operating_hours, "operating_hours")?,
            is_active,
            is_verified,
            created_at,
        })
    }
}

/// `blood_requests` table row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = blood_requests)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BloodRequestRow {
    pub id: Uuid,
    pub requested_by: Uuid,
    pub patient_name: String,
    pub blood_group: String,
    pub units: i32,
    pub urgency: String,
    pub hospital: String,
    pub contact_number: String,
    pub required_by: DateTime<Utc>,
    pub description: Option<String>,
    pub blood_bank: Option<Uuid>,
    pub status: String,
    pub bank_response: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodRequestRow {
    /// Flatten a domain request into its storable row.
    pub fn from_domain(request: &BloodRequest) -> Result<Self, String> {
        Ok(Self {
            id: *request.id.as_uuid(),
            requested_by: *request.requested_by.as_uuid(),
            patient_name: request.patient_name.clone(),
            blood_group: request.blood_group.as_str().to_owned(),
            units: i32::try_from(request.units).map_err(|_| "units out of range".to_owned())?,
            urgency: request.urgency.as_str().to_owned(),
            hospital: request.hospital.clone(),
            contact_number: request.contact_number.clone(),
            required_by: request.required_by,
            description: request.description.clone(),
            blood_bank: request.blood_bank.map(|bank| *bank.as_uuid()),
            status: request.status.as_str().to_owned(),
            bank_response: request
                .bank_response
                .as_ref()
                .map(|response| encode(response, "bank_response"))
                .transpose()?,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }

    /// Rebuild the domain request from a stored row.
    pub fn into_domain(self) -> Result<BloodRequest, String> {
        let Self {
            id,
            requested_by,
            patient_name,
            blood_group,
            units,
            urgency,
            hospital,
            contact_number,
            required_by,
            description,
            blood_bank,
            status,
            bank_response,
            created_at,
            updated_at,
        } = self;
        Ok(BloodRequest {
            id: RequestId::from_uuid(id),
            requested_by: UserId::from_uuid(requested_by),
            patient_name,
            blood_group: blood_group
                .parse::<BloodGroup>()
                .map_err(|err| err.to_string())?,
            units: u32::try_from(units).map_err(|_| "stored units negative".to_owned())?,
            urgency: parse_urgency(&urgency)?,
            hospital,
            contact_number,
            required_by,
            description,
            blood_bank: blood_bank.map(BankId::from_uuid),
            status: status
                .parse::<RequestStatus>()
                .map_err(|err| err.to_string())?,
            bank_response: bank_response
                .map(|value| decode::<BankResponse>(value, "bank_response"))
                .transpose()?,
            created_at,
            updated_at,
        })
    }
}

/// `donation_camps` table row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = donation_camps)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CampRow {
    pub id: Uuid,
    pub organizer: Uuid,
    pub organizer_name: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub target_units: i32,
    pub collected_units: i32,
    pub description: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: String,
    pub registered_donors: Value,
    pub created_at: DateTime<Utc>,
}

impl CampRow {
    /// Flatten a domain camp into its storable row.
    pub fn from_domain(camp: &DonationCamp) -> Result<Self, String> {
        Ok(Self {
            id: *camp.id.as_uuid(),
            organizer: *camp.organizer.as_uuid(),
            organizer_name: camp.organizer_name.clone(),
            name: camp.name.clone(),
            date: camp.date,
            start_time: camp.start_time.clone(),
            end_time: camp.end_time.clone(),
            venue: camp.venue.clone(),
            address: camp.address.clone(),
            city: camp.city.clone(),
            state: camp.state.clone(),
            pincode: camp.pincode.clone(),
            target_units: i32::try_from(camp.target_units)
                .map_err(|_| "target units out of range".to_owned())?,
            collected_units: i32::try_from(camp.collected_units)
                .map_err(|_| "collected units out of range".to_owned())?,
            description: camp.description.clone(),
            contact_phone: camp.contact_phone.clone(),
            contact_email: camp.contact_email.clone(),
            status: camp.status.as_str().to_owned(),
            registered_donors: encode(&camp.registered_donors, "registered_donors")?,
            created_at: camp.created_at,
        })
    }

    /// Rebuild the domain camp from a stored row.
    pub fn into_domain(self) -> Result<DonationCamp, String> {
        let Self {
            id,
            organizer,
            organizer_name,
            name,
            date,
            start_time,
            end_time,
            venue,
            address,
            city,
            state,
            pincode,
            target_units,
            collected_units,
            description,
            contact_phone,
            contact_email,
            status,
            registered_donors,
            created_at,
        } = self;
        Ok(DonationCamp {
            id: CampId::from_uuid(id),
            organizer: BankId::from_uuid(organizer),
            organizer_name,
            name,
            date,
            start_time,
            end_time,
            venue,
            address,
            city,
            state,
            pincode,
            target_units: u32::try_from(target_units)
                .map_err(|_| "stored target units negative".to_owned())?,
            collected_units: u32::try_from(collected_units)
                .map_err(|_| "stored collected units negative".to_owned())?,
            description,
            contact_phone,
            contact_email,
            status: status.parse::<CampStatus>().map_err(|err| err.to_string())?,
            registered_donors: decode::<Vec<CampRegistration>>(
                registered_donors,
                "registered_donors",
            )?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Row conversions round-trip every aggregate.

    use chrono::Utc;

    use super::*;
    use crate::domain::auth::{BankRegistration, NewRegistration};
    use crate::domain::camp::CampDraft;
    use crate::domain::request::RequestDraft;

    #[test]
    fn user_rows_round_trip() {
        let registration = NewRegistration::try_new(
            "Asha Rao",
            "a@x.com",
            "secret-pw",
            "5550100",
            Some(BloodGroup::BPositive),
            true,
            Some(Address {
                city: "Springfield".to_owned(),
                ..Address::default()
            }),
        )
        .expect("valid registration");
        let mut user = UserAccount::from_registration(
            UserId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        user.location = Some(GeoPoint::new(-0.1, 51.5));
        user.set_donor_profile(DonorProfile::default(), Utc::now());

        let row = UserRow::from_domain(&user).expect("row builds");
        let rebuilt = row.into_domain().expect("domain rebuilds");
        assert_eq!(rebuilt, user);
    }

    #[test]
    fn bank_rows_round_trip() {
        let registration = BankRegistration::try_new(
            "City Blood Bank",
            "bank@x.com",
            "secret-pw",
            "5550123",
            "LIC-42",
            Some("REG-7".to_owned()),
            Some(1998),
            None,
        )
        .expect("valid registration");
        let mut bank = BloodBankAccount::from_registration(
            BankId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        bank.inventory.set_units(BloodGroup::ONegative, 3, Utc::now());

        let row = BankRow::from_domain(&bank).expect("row builds");
        let rebuilt = row.into_domain().expect("domain rebuilds");
        assert_eq!(rebuilt, bank);
    }

    #[test]
    fn request_rows_round_trip_with_a_bank_response() {
        let draft = RequestDraft::try_new(
            "Patient Zero",
            BloodGroup::ONegative,
            2,
            Urgency::Urgent,
            "General Hospital",
            "5550100",
            Utc::now(),
            Some("note".to_owned()),
        )
        .expect("valid draft");
        let mut request =
            BloodRequest::open(RequestId::random(), UserId::random(), draft, Utc::now());
        let bank = BankId::random();
        request.status = RequestStatus::Approved;
        request.blood_bank = Some(bank);
        request.bank_response = Some(BankResponse {
            status: RequestStatus::Approved,
            responded_by: bank,
            responded_at: Utc::now(),
            note: None,
        });

        let row = BloodRequestRow::from_domain(&request).expect("row builds");
        let rebuilt = row.into_domain().expect("domain rebuilds");
        assert_eq!(rebuilt, request);
    }

    #[test]
    fn camp_rows_round_trip() {
        let draft = CampDraft {
            name: "Spring Drive".to_owned(),
            date: Utc::now(),
            start_time: "09:00".to_owned(),
            end_time: "16:00".to_owned(),
            venue: "Town Hall".to_owned(),
            address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            pincode: "62701".to_owned(),
            target_units: 50,
            description: None,
            contact_phone: Some("5550123".to_owned()),
            contact_email: None,
        };
        let camp = DonationCamp::open(
            CampId::random(),
            BankId::random(),
            "City Blood Bank".to_owned(),
            draft,
            Utc::now(),
        );

        let row = CampRow::from_domain(&camp).expect("row builds");
        let rebuilt = row.into_domain().expect("domain rebuilds");
        assert_eq!(rebuilt, camp);
    }

    #[test]
    fn corrupt_status_text_fails_conversion() {
        let draft = RequestDraft::try_new(
            "Patient Zero",
            BloodGroup::APositive,
            1,
            Urgency::Normal,
            "General Hospital",
            "5550100",
            Utc::now(),
            None,
        )
        .expect("valid draft");
        let request = BloodRequest::open(RequestId::random(), UserId::random(), draft, Utc::now());
        let mut row = BloodRequestRow::from_domain(&request).expect("row builds");
        row.status = "resolved".to_owned();
        assert!(row.into_domain().is_err());
    }
}
