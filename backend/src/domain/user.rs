//! Individual account aggregate: profile, donor status, and medical details.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::{EmailAddress, FederatedIdentity, NewRegistration};
use super::blood_group::BloodGroup;
use super::geo::GeoPoint;
use super::ids::UserId;
use super::password::PasswordHash;

/// Account role. Donors are ordinary users who have completed the donor
/// questionnaire; admins additionally see the reporting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Donor,
    Admin,
}

impl Role {
    /// Stable wire form of the role.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Donor => "donor",
            Self::Admin => "admin",
        }
    }
}

/// Postal address fragment carried on accounts, banks, and camps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Emergency contact recorded with a donor profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Chronic condition flags from the donor questionnaire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct DiseaseHistory {
    pub hiv: bool,
    pub hepatitis_b: bool,
    pub hepatitis_c: bool,
    pub malaria: bool,
    pub tuberculosis: bool,
    pub heart_disease: bool,
    pub diabetes: bool,
    pub cancer: bool,
    pub blood_disorder: bool,
    pub epilepsy: bool,
}

/// Recent events that temporarily defer a donor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct RecentConditions {
    pub fever: bool,
    pub cold_or_flu: bool,
    pub antibiotics: bool,
    pub surgery: bool,
    pub tattoo_or_piercing: bool,
    pub pregnancy: bool,
    pub vaccination: bool,
}

/// Self-reported lifestyle answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Lifestyle {
    pub alcohol: String,
    pub smoking: String,
    pub drug_use: bool,
}

/// The donor medical questionnaire, set when an account becomes a donor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct DonorProfile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub last_donation_date: Option<DateTime<Utc>>,
    pub donation_count: Option<u32>,
    pub blood_pressure: Option<String>,
    pub haemoglobin_level: Option<f64>,
    pub diseases: DiseaseHistory,
    pub recent_conditions: RecentConditions,
    pub lifestyle: Lifestyle,
    pub emergency_contact: Option<EmergencyContact>,
    pub consent: bool,
    pub accuracy_declaration: bool,
    pub is_eligible: Option<bool>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub is_donor: Option<bool>,
    pub is_available: Option<bool>,
    pub address: Option<Address>,
    pub location: Option<GeoPoint>,
}

/// An individual user account.
///
/// ## Invariants
/// - `email` is validated, lowercased, and unique within the user table.
/// - `password_hash` is always a bcrypt digest, never plaintext.
/// - `donor_profile` is only present once the questionnaire has been
///   submitted, at which point `is_donor` is also set.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub phone: String,
    pub blood_group: Option<BloodGroup>,
    pub role: Role,
    pub is_donor: bool,
    pub is_available: bool,
    pub address: Option<Address>,
    pub location: Option<GeoPoint>,
    pub provider_id: Option<String>,
    pub photo_url: Option<String>,
    pub donor_profile: Option<DonorProfile>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Build a freshly registered account.
    pub fn from_registration(
        id: UserId,
        registration: &NewRegistration,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: registration.name.clone(),
            email: registration.email.clone(),
            password_hash,
            phone: registration.phone.clone(),
            blood_group: registration.blood_group,
            role: Role::User,
            is_donor: registration.is_donor,
            is_available: true,
            address: registration.address.clone(),
            location: None,
            provider_id: None,
            photo_url: None,
            donor_profile: None,
            created_at,
        }
    }

    /// Build an account for a first-time federated sign-in.
    ///
    /// The blood group defaults to the commonest type until the user updates
    /// their profile, mirroring the behaviour of the registration form.
    pub fn from_federated(
        id: UserId,
        identity: &FederatedIdentity,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            password_hash,
            phone: String::new(),
            blood_group: Some(BloodGroup::OPositive),
            role: Role::User,
            is_donor: false,
            is_available: true,
            address: Some(Address::default()),
            location: None,
            provider_id: Some(identity.provider_id.clone()),
            photo_url: identity.photo_url.clone(),
            donor_profile: None,
            created_at,
        }
    }

    /// Apply a partial profile update in place.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            phone,
            blood_group,
            is_donor,
            is_available,
            address,
            location,
        } = update;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(blood_group) = blood_group {
            self.blood_group = Some(blood_group);
        }
        if let Some(is_donor) = is_donor {
            self.is_donor = is_donor;
        }
        if let Some(is_available) = is_available {
            self.is_available = is_available;
        }
        if let Some(address) = address {
            self.address = Some(address);
        }
        if let Some(location) = location {
            self.location = Some(location);
        }
    }

    /// Record the donor questionnaire and flag the account as a donor.
    pub fn set_donor_profile(&mut self, mut profile: DonorProfile, now: DateTime<Utc>) {
        profile.last_updated = Some(now);
        self.donor_profile = Some(profile);
        self.is_donor = true;
    }

    /// Link a federated provider identity to an existing account.
    pub fn link_provider(&mut self, provider_id: String, photo_url: Option<String>) {
        self.provider_id = Some(provider_id);
        if photo_url.is_some() {
            self.photo_url = photo_url;
        }
    }
}
