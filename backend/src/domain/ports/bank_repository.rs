//! Port abstraction for blood-bank persistence adapters.

use async_trait::async_trait;

use crate::domain::auth::EmailAddress;
use crate::domain::blood_bank::BloodBankAccount;
use crate::domain::ids::BankId;

use super::macros::define_store_error;

define_store_error! {
    /// Persistence errors raised by bank repository adapters.
    pub enum BankStoreError {
        /// Repository connection could not be established.
        Connection(connection) => "bank store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query(query) => "bank store query failed: {message}",
        /// A uniqueness constraint (email or licence) was violated.
        Duplicate(duplicate) => "bank store uniqueness violated: {message}",
    }
}

/// Driven port for blood-bank storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankRepository: Send + Sync {
    /// Insert a new bank; fails with [`BankStoreError::Duplicate`] when the
    /// email or licence number is already taken.
    async fn insert(&self, bank: &BloodBankAccount) -> Result<(), BankStoreError>;

    /// Fetch a bank by identifier.
    async fn find_by_id(&self, id: BankId) -> Result<Option<BloodBankAccount>, BankStoreError>;

    /// Fetch a bank by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<BloodBankAccount>, BankStoreError>;

    /// Every bank, for reporting.
    async fn list_all(&self) -> Result<Vec<BloodBankAccount>, BankStoreError>;
}
