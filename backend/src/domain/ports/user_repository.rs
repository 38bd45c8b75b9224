//! Port abstraction for user-account persistence adapters.

use async_trait::async_trait;

use crate::domain::auth::EmailAddress;
use crate::domain::blood_group::BloodGroup;
use crate::domain::ids::UserId;
use crate::domain::user::UserAccount;

use super::macros::define_store_error;

define_store_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserStoreError {
        /// Repository connection could not be established.
        Connection(connection) => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query(query) => "user store query failed: {message}",
        /// A uniqueness constraint (email) was violated.
        Duplicate(duplicate) => "user store uniqueness violated: {message}",
    }
}

/// Driven port for user-account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with [`UserStoreError::Duplicate`] when
    /// the email is already taken.
    async fn insert(&self, user: &UserAccount) -> Result<(), UserStoreError>;

    /// Replace an existing account record.
    async fn update(&self, user: &UserAccount) -> Result<(), UserStoreError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserStoreError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError>;

    /// Every account, for reporting.
    async fn list_all(&self) -> Result<Vec<UserAccount>, UserStoreError>;

    /// Donor accounts currently marked available, optionally narrowed to one
    /// blood group.
    async fn list_available_donors(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<UserAccount>, UserStoreError>;
}
