//! Donation camp aggregate: bank-organised collection drives that donors
//! register for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blood_group::BloodGroup;
use super::ids::{BankId, CampId, UserId};
use super::user::UserAccount;

/// Lifecycle state of a camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl CampStatus {
    /// Stable wire and storage form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for CampStatus {
    type Err = CampStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CampStatusParseError {
                raw: other.to_owned(),
            }),
        }
    }
}

/// Error for unrecognised camp status text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised camp status: {raw:?}")]
pub struct CampStatusParseError {
    raw: String,
}

/// A donor's registration, snapshotting contact details at sign-up time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampRegistration {
    pub donor: UserId,
    pub name: String,
    pub phone: String,
    pub blood_group: Option<BloodGroup>,
    pub registered_at: DateTime<Utc>,
}

/// Fields a camp organiser may change after creation; `None` leaves the
/// current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub target_units: Option<u32>,
    pub description: Option<String>,
    pub status: Option<CampStatus>,
}

/// A validated new-camp form.
#[derive(Debug, Clone, PartialEq)]
pub struct CampDraft {
    pub name: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub target_units: u32,
    pub description: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

/// Validation errors for a new camp payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampValidationError {
    EmptyName,
    EmptyVenue,
    EmptyCity,
}

impl std::fmt::Display for CampValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "camp name must not be empty"),
            Self::EmptyVenue => write!(f, "venue must not be empty"),
            Self::EmptyCity => write!(f, "city must not be empty"),
        }
    }
}

impl std::error::Error for CampValidationError {}

impl CampDraft {
    /// Check the fields a listing cannot do without.
    pub fn validate(&self) -> Result<(), CampValidationError> {
        if self.name.trim().is_empty() {
            return Err(CampValidationError::EmptyName);
        }
        if self.venue.trim().is_empty() {
            return Err(CampValidationError::EmptyVenue);
        }
        if self.city.trim().is_empty() {
            return Err(CampValidationError::EmptyCity);
        }
        Ok(())
    }
}

/// A blood-donation camp organised by a bank.
///
/// ## Invariants
/// - `organizer` never changes; only the organiser may update or delete.
/// - a donor appears at most once in `registered_donors`.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationCamp {
    pub id: CampId,
    pub organizer: BankId,
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
    pub target_units: u32,
    pub collected_units: u32,
    pub description: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: CampStatus,
    pub registered_donors: Vec<CampRegistration>,
    pub created_at: DateTime<Utc>,
}

impl DonationCamp {
    /// Open a new scheduled camp on behalf of `organizer`.
    pub fn open(
        id: CampId,
        organizer: BankId,
        organizer_name: String,
        draft: CampDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let CampDraft {
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
            description,
            contact_phone,
            contact_email,
        } = draft;
        Self {
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
            collected_units: 0,
            description,
            contact_phone,
            contact_email,
            status: CampStatus::Scheduled,
            registered_donors: Vec::new(),
            created_at: now,
        }
    }

    /// Apply an organiser's partial update.
    pub fn apply_patch(&mut self, patch: CampPatch) {
        let CampPatch {
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
            description,
            status,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(start_time) = start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = end_time {
            self.end_time = end_time;
        }
        if let Some(venue) = venue {
            self.venue = venue;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(city) = city {
            self.city = city;
        }
        if let Some(state) = state {
            self.state = state;
        }
        if let Some(pincode) = pincode {
            self.pincode = pincode;
        }
        if let Some(target_units) = target_units {
            self.target_units = target_units;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(status) = status {
            self.status = status;
        }
    }

    /// Whether `donor` has already signed up.
    pub fn is_registered(&self, donor: UserId) -> bool {
        self.registered_donors
            .iter()
            .any(|registration| registration.donor == donor)
    }

    /// Record a donor sign-up, snapshotting their contact details.
    ///
    /// Returns `false` when the donor was already registered.
    pub fn register_donor(&mut self, donor: &UserAccount, now: DateTime<Utc>) -> bool {
        if self.is_registered(donor.id) {
            return false;
        }
        self.registered_donors.push(CampRegistration {
            donor: donor.id,
            name: donor.name.clone(),
            phone: donor.phone.clone(),
            blood_group: donor.blood_group,
            registered_at: now,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::NewRegistration;
    use crate::domain::password::PasswordHash;

    fn draft() -> CampDraft {
        CampDraft {
            name: "Spring Drive".to_owned(),
            date: Utc::now() + chrono::Duration::days(10),
            start_time: "09:00".to_owned(),
            end_time: "16:00".to_owned(),
            venue: "Town Hall".to_owned(),
            address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            pincode: "62701".to_owned(),
            target_units: 50,
            description: None,
            contact_phone: None,
            contact_email: None,
        }
    }

    fn donor() -> UserAccount {
        let registration = NewRegistration::try_new(
            "Ravi Kumar",
            "ravi@example.com",
            "secret-pw",
            "5550111",
            Some(BloodGroup::OPositive),
            true,
            None,
        )
        .expect("valid registration");
        UserAccount::from_registration(
            UserId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        )
    }

    #[test]
    fn new_camps_are_scheduled_and_empty() {
        let camp = DonationCamp::open(
            CampId::random(),
            BankId::random(),
            "City Blood Bank".to_owned(),
            draft(),
            Utc::now(),
        );
        assert_eq!(camp.status, CampStatus::Scheduled);
        assert_eq!(camp.collected_units, 0);
        assert!(camp.registered_donors.is_empty());
    }

    #[test]
    fn duplicate_registration_is_refused() {
        let mut camp = DonationCamp::open(
            CampId::random(),
            BankId::random(),
            "City Blood Bank".to_owned(),
            draft(),
            Utc::now(),
        );
        let donor = donor();
        assert!(camp.register_donor(&donor, Utc::now()));
        assert!(!camp.register_donor(&donor, Utc::now()));
        assert_eq!(camp.registered_donors.len(), 1);
    }

    #[test]
    fn registration_snapshots_contact_details() {
        let mut camp = DonationCamp::open(
            CampId::random(),
            BankId::random(),
            "City Blood Bank".to_owned(),
            draft(),
            Utc::now(),
        );
        let donor = donor();
        camp.register_donor(&donor, Utc::now());
        let entry = camp.registered_donors.first().expect("registered");
        assert_eq!(entry.name, "Ravi Kumar");
        assert_eq!(entry.blood_group, Some(BloodGroup::OPositive));
    }

    #[test]
    fn patches_only_touch_supplied_fields() {
        let mut camp = DonationCamp::open(
            CampId::random(),
            BankId::random(),
            "City Blood Bank".to_owned(),
            draft(),
            Utc::now(),
        );
        camp.apply_patch(CampPatch {
            status: Some(CampStatus::Completed),
            ..CampPatch::default()
        });
        assert_eq!(camp.status, CampStatus::Completed);
        assert_eq!(camp.name, "Spring Drive");
    }

    #[test]
    fn blank_names_fail_validation() {
        let mut bad = draft();
        bad.name = "  ".to_owned();
        assert_eq!(bad.validate(), Err(CampValidationError::EmptyName));
    }
}
