//! Blood-bank account aggregate and its per-group inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth::{BankRegistration, EmailAddress};
use super::blood_group::BloodGroup;
use super::geo::GeoPoint;
use super::ids::BankId;
use super::password::PasswordHash;
use super::user::Address;

/// Units on hand for one blood group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    pub blood_group: BloodGroup,
    pub units: u32,
    pub last_updated: DateTime<Utc>,
}

/// Per-group stock levels for a bank.
///
/// Groups with no recorded level count as zero units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(Vec<InventoryLevel>);

impl Inventory {
    /// An inventory with nothing recorded yet.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Units on hand for `group`.
    pub fn units_of(&self, group: BloodGroup) -> u32 {
        self.0
            .iter()
            .find(|level| level.blood_group == group)
            .map_or(0, |level| level.units)
    }

    /// Record the stock level for `group`, stamping the update time.
    pub fn set_units(&mut self, group: BloodGroup, units: u32, now: DateTime<Utc>) {
        if let Some(level) = self.0.iter_mut().find(|level| level.blood_group == group) {
            level.units = units;
            level.last_updated = now;
        } else {
            self.0.push(InventoryLevel {
                blood_group: group,
                units,
                last_updated: now,
            });
        }
    }

    /// All recorded levels.
    pub fn levels(&self) -> &[InventoryLevel] {
        &self.0
    }
}

/// Weekly opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub open: String,
    pub close: String,
    pub days: Vec<String>,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            open: "09:00".to_owned(),
            close: "18:00".to_owned(),
            days: Vec::new(),
        }
    }
}

/// A registered blood-bank account.
///
/// ## Invariants
/// - `email` is unique within the bank table (independently of the user
///   table) and `license_number` is unique among banks.
/// - `is_verified` starts false and is only flipped by an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct BloodBankAccount {
    pub id: BankId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub phone: String,
    pub license_number: String,
    pub registration_number: Option<String>,
    pub established_year: Option<i32>,
    pub address: Option<Address>,
    pub location: Option<GeoPoint>,
    pub inventory: Inventory,
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl BloodBankAccount {
    /// Build a freshly registered, unverified bank.
    pub fn from_registration(
        id: BankId,
        registration: &BankRegistration,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: registration.name.clone(),
            email: registration.email.clone(),
            password_hash,
            phone: registration.phone.clone(),
            license_number: registration.license_number.clone(),
            registration_number: registration.registration_number.clone(),
            established_year: registration.established_year,
            address: registration.address.clone(),
            location: None,
            inventory: Inventory::empty(),
            operating_hours: OperatingHours::default(),
            is_active: true,
            is_verified: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_groups_report_zero_units() {
        let inventory = Inventory::empty();
        assert_eq!(inventory.units_of(BloodGroup::ONegative), 0);
    }

    #[test]
    fn set_units_inserts_then_overwrites() {
        let mut inventory = Inventory::empty();
        let first = Utc::now();
        inventory.set_units(BloodGroup::APositive, 4, first);
        assert_eq!(inventory.units_of(BloodGroup::APositive), 4);

        let later = first + chrono::Duration::hours(1);
        inventory.set_units(BloodGroup::APositive, 2, later);
        assert_eq!(inventory.units_of(BloodGroup::APositive), 2);
        assert_eq!(inventory.levels().len(), 1);
        assert_eq!(inventory.levels()[0].last_updated, later);
    }

    #[test]
    fn new_banks_start_unverified_with_default_hours() {
        let registration = BankRegistration::try_new(
            "City Blood Bank",
            "bank@example.com",
            "secret-pw",
            "5550123",
            "LIC-42",
            None,
            Some(1998),
            None,
        )
        .expect("valid registration");
        let bank = BloodBankAccount::from_registration(
            BankId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        assert!(!bank.is_verified);
        assert!(bank.is_active);
        assert_eq!(bank.operating_hours.open, "09:00");
        assert_eq!(bank.inventory.levels().len(), 0);
    }
}
