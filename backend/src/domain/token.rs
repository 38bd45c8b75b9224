//! Bearer-token issuance and verification.
//!
//! Tokens are stateless HS256 claim sets carrying the subject id, email, and
//! identity kind, valid for seven days from issuance. The signing secret is
//! injected at construction; no other process-wide state exists. Revocation
//! is out of scope.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::actor::{Actor, ActorKind};
use super::auth::EmailAddress;
use super::ids::{BankId, UserId};
use super::user::Role;

/// Token lifetime: seven days.
pub const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Hex characters of the secret fingerprint exposed in logs.
const FINGERPRINT_LEN: usize = 12;

/// Token failures.
///
/// Verification failures are deliberately opaque: callers cannot tell a bad
/// signature from an expired or malformed token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not valid")]
    Invalid,
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

/// The signed claim set carried by a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (user or bank id).
    pub sub: Uuid,
    /// Account email at issuance time.
    pub email: String,
    /// Identity kind: `"user"` or `"bloodbank"`.
    #[serde(rename = "type")]
    pub kind: ActorKind,
    /// Role of an individual subject; absent for banks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Resolve the claim set into a tagged [`Actor`].
    pub fn actor(&self) -> Actor {
        match self.kind {
            ActorKind::Individual => Actor::Individual {
                id: UserId::from_uuid(self.sub),
                role: self.role.unwrap_or(Role::User),
            },
            ActorKind::BloodBank => Actor::BloodBank {
                id: BankId::from_uuid(self.sub),
            },
        }
    }
}

/// An encoded, signed token ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    /// The compact JWT form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the compact JWT form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues and verifies bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    fingerprint: String,
    ttl_seconds: i64,
}

impl TokenIssuer {
    /// Build an issuer with the standard seven-day lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, TOKEN_TTL_SECONDS)
    }

    /// Build an issuer with a custom lifetime (tests use this to produce
    /// already-expired tokens).
    pub fn with_ttl(secret: &[u8], ttl_seconds: i64) -> Self {
        let digest = Sha256::digest(secret);
        let mut fingerprint = hex::encode(digest);
        fingerprint.truncate(FINGERPRINT_LEN);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            fingerprint,
            ttl_seconds,
        }
    }

    /// A short hash of the signing secret, safe to log at startup.
    pub fn secret_fingerprint(&self) -> &str {
        self.fingerprint.as_str()
    }

    /// Sign a claim set for `actor`, expiring [`TOKEN_TTL_SECONDS`] from
    /// `now`.
    pub fn issue(
        &self,
        actor: &Actor,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let (sub, role) = match actor {
            Actor::Individual { id, role } => (*id.as_uuid(), Some(*role)),
            Actor::BloodBank { id } => (*id.as_uuid(), None),
        };
        let claims = Claims {
            sub,
            email: email.as_str().to_owned(),
            kind: actor.kind(),
            role,
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_seconds,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(SignedToken)
            .map_err(|err| TokenError::Signing {
                message: err.to_string(),
            })
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
