//! Driving port for registration and login use-cases.
//!
//! Inbound adapters call this to authenticate without knowing the backing
//! stores. A successful call always pairs the stored identity with a freshly
//! issued bearer token.

use async_trait::async_trait;

use crate::domain::auth::{BankRegistration, FederatedIdentity, LoginCredentials, NewRegistration};
use crate::domain::blood_bank::BloodBankAccount;
use crate::domain::error::Error;
use crate::domain::token::SignedToken;
use crate::domain::user::UserAccount;

/// An authenticated individual plus their bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserAccount,
    pub token: SignedToken,
}

/// An authenticated bank plus its bearer token.
#[derive(Debug, Clone)]
pub struct BankSession {
    pub bank: BloodBankAccount,
    pub token: SignedToken,
}

/// Domain use-case port for account registration and authentication.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new individual; fails when the email is already taken.
    async fn register_user(&self, registration: NewRegistration) -> Result<AuthSession, Error>;

    /// Authenticate an individual. Unknown email and wrong password produce
    /// the identical error.
    async fn login_user(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Find-or-create an individual from an externally verified identity.
    async fn login_federated(&self, identity: FederatedIdentity) -> Result<AuthSession, Error>;

    /// Register a new blood bank; duplicate email or licence number fails.
    async fn register_bank(&self, registration: BankRegistration) -> Result<BankSession, Error>;

    /// Authenticate a blood bank.
    async fn login_bank(&self, credentials: LoginCredentials) -> Result<BankSession, Error>;
}
