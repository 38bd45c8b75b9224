//! Account registration and login use-cases.
//!
//! One service covers both identity tables. Credential failures are
//! reported with a single message whether the email was unknown or the
//! password wrong, so the endpoint cannot be used to enumerate accounts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::actor::Actor;
use crate::domain::auth::{
    BankRegistration, FederatedIdentity, LoginCredentials, NewRegistration,
};
use crate::domain::blood_bank::BloodBankAccount;
use crate::domain::error::Error;
use crate::domain::ids::{BankId, UserId};
use crate::domain::password::{PasswordError, hash_password, random_placeholder, verify_password};
use crate::domain::ports::{
    AccountService, AuthSession, BankRepository, BankSession, BankStoreError, Clock,
    UserRepository, UserStoreError,
};
use crate::domain::token::{SignedToken, TokenIssuer};
use crate::domain::user::UserAccount;

fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } | UserStoreError::Duplicate { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn map_bank_store_error(error: BankStoreError) -> Error {
    match error {
        BankStoreError::Connection { message } => {
            Error::service_unavailable(format!("bank store unavailable: {message}"))
        }
        BankStoreError::Query { message } | BankStoreError::Duplicate { message } => {
            Error::internal(format!("bank store error: {message}"))
        }
    }
}

fn map_password_error(error: PasswordError) -> Error {
    Error::internal(format!("password processing failed: {error}"))
}

fn duplicate_user() -> Error {
    Error::invalid_request("an account with this email already exists")
        .with_details(json!({ "code": "duplicate_identity" }))
}

fn duplicate_bank() -> Error {
    Error::invalid_request("a bank with this email or licence number already exists")
        .with_details(json!({ "code": "duplicate_identity" }))
}

// One message for both unknown email and wrong password.
fn invalid_credentials() -> Error {
    Error::invalid_request("invalid credentials")
}

/// [`AccountService`] implementation over the two identity repositories.
#[derive(Clone)]
pub struct AccountServiceImpl<U, B> {
    users: Arc<U>,
    banks: Arc<B>,
    tokens: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<U, B> AccountServiceImpl<U, B> {
    /// Wire the service to its repositories, token issuer, and clock.
    pub fn new(users: Arc<U>, banks: Arc<B>, tokens: Arc<TokenIssuer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            banks,
            tokens,
            clock,
        }
    }
}

impl<U, B> AccountServiceImpl<U, B> {
    fn issue_for_user(
        &self,
        user: &UserAccount,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<SignedToken, Error> {
        let actor = Actor::Individual {
            id: user.id,
            role: user.role,
        };
        self.tokens
            .issue(&actor, &user.email, now)
            .map_err(|err| Error::internal(format!("token issuance failed: {err}")))
    }

    fn issue_for_bank(
        &self,
        bank: &BloodBankAccount,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<SignedToken, Error> {
        let actor = Actor::BloodBank { id: bank.id };
        self.tokens
            .issue(&actor, &bank.email, now)
            .map_err(|err| Error::internal(format!("token issuance failed: {err}")))
    }
}

#[async_trait]
impl<U, B> AccountService for AccountServiceImpl<U, B>
where
    U: UserRepository,
    B: BankRepository,
{
    async fn register_user(&self, registration: NewRegistration) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_user_store_error)?;
        if existing.is_some() {
            return Err(duplicate_user());
        }

        let password_hash = hash_password(registration.password())
            .await
            .map_err(map_password_error)?;
        let now = self.clock.now();
        let user =
            UserAccount::from_registration(UserId::random(), &registration, password_hash, now);

        match self.users.insert(&user).await {
            Ok(()) => {}
            // A concurrent registration can still win the unique index.
            Err(UserStoreError::Duplicate { .. }) => return Err(duplicate_user()),
            Err(err) => return Err(map_user_store_error(err)),
        }

        info!(user = %user.id, "registered new user account");
        let token = self.issue_for_user(&user, now)?;
        Ok(AuthSession { user, token })
    }

    async fn login_user(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_store_error)?
        else {
            return Err(invalid_credentials());
        };

        let matches = verify_password(credentials.password(), &user.password_hash)
            .await
            .map_err(map_password_error)?;
        if !matches {
            return Err(invalid_credentials());
        }

        let token = self.issue_for_user(&user, self.clock.now())?;
        Ok(AuthSession { user, token })
    }

    async fn login_federated(&self, identity: FederatedIdentity) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_store_error)?;

        let user = match existing {
            Some(mut user) => {
                if user.provider_id.is_none() {
                    user.link_provider(identity.provider_id.clone(), identity.photo_url.clone());
                    self.users
                        .update(&user)
                        .await
                        .map_err(map_user_store_error)?;
                }
                user
            }
            None => {
                // The account keeps a random placeholder credential so it can
                // only be entered through the provider until a reset.
                let password_hash = hash_password(random_placeholder())
                    .await
                    .map_err(map_password_error)?;
                let user = UserAccount::from_federated(
                    UserId::random(),
                    &identity,
                    password_hash,
                    self.clock.now(),
                );
                match self.users.insert(&user).await {
                    Ok(()) => {}
                    Err(UserStoreError::Duplicate { .. }) => return Err(duplicate_user()),
                    Err(err) => return Err(map_user_store_error(err)),
                }
                info!(user = %user.id, "created account from federated sign-in");
                user
            }
        };

        let token = self.issue_for_user(&user, self.clock.now())?;
        Ok(AuthSession { user, token })
    }

    async fn register_bank(&self, registration: BankRegistration) -> Result<BankSession, Error> {
        let existing = self
            .banks
            .find_by_email(&registration.email)
            .await
            .map_err(map_bank_store_error)?;
        if existing.is_some() {
            return Err(duplicate_bank());
        }

        let password_hash = hash_password(registration.password())
            .await
            .map_err(map_password_error)?;
        let now = self.clock.now();
        let bank =
            BloodBankAccount::from_registration(BankId::random(), &registration, password_hash, now);

        match self.banks.insert(&bank).await {
            Ok(()) => {}
            // Covers the licence-number unique index as well as the email.
            Err(BankStoreError::Duplicate { .. }) => return Err(duplicate_bank()),
            Err(err) => return Err(map_bank_store_error(err)),
        }

        info!(bank = %bank.id, "registered new blood bank");
        let token = self.issue_for_bank(&bank, now)?;
        Ok(BankSession { bank, token })
    }

    async fn login_bank(&self, credentials: LoginCredentials) -> Result<BankSession, Error> {
        let Some(bank) = self
            .banks
            .find_by_email(credentials.email())
            .await
            .map_err(map_bank_store_error)?
        else {
            return Err(invalid_credentials());
        };

        let matches = verify_password(credentials.password(), &bank.password_hash)
            .await
            .map_err(map_password_error)?;
        if !matches {
            return Err(invalid_credentials());
        }

        let token = self.issue_for_bank(&bank, self.clock.now())?;
        Ok(BankSession { bank, token })
    }
}
