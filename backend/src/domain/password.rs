//! Password hashing and verification.
//!
//! Passwords are stored only as salted bcrypt digests. Hashing is pushed
//! onto the blocking pool so a registration burst cannot stall the reactor,
//! and plaintext is carried in [`Zeroizing`] buffers so it is wiped once the
//! digest exists.

use rand::Rng;
use rand::distributions::Alphanumeric;
use zeroize::Zeroizing;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Length of the generated placeholder password for federated sign-ins.
const PLACEHOLDER_LEN: usize = 32;

/// Errors raised while hashing or checking a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The bcrypt computation itself failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
}

impl PasswordError {
    fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// A stored bcrypt digest.
///
/// Deliberately implements neither `Serialize` nor `Display`, so a digest
/// cannot drift into a wire payload by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest loaded from the store.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The digest in its storable form.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hash a plaintext password on the blocking pool.
pub async fn hash_password(plaintext: Zeroizing<String>) -> Result<PasswordHash, PasswordError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext.as_str(), bcrypt::DEFAULT_COST))
        .await
        .map_err(|err| PasswordError::hash(err.to_string()))?
        .map(PasswordHash)
        .map_err(|err| PasswordError::hash(err.to_string()))
}

/// Check a plaintext password against a stored digest.
pub async fn verify_password(
    plaintext: Zeroizing<String>,
    hash: &PasswordHash,
) -> Result<bool, PasswordError> {
    let digest = hash.0.clone();
    tokio::task::spawn_blocking(move || bcrypt::verify(plaintext.as_str(), &digest))
        .await
        .map_err(|err| PasswordError::hash(err.to_string()))?
        .map_err(|err| PasswordError::hash(err.to_string()))
}

/// Generate the random placeholder credential given to federated accounts.
///
/// The account stays loginable through normal credentials only after a
/// password reset; nobody ever sees this value.
pub fn random_placeholder() -> Zeroizing<String> {
    let generated: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PLACEHOLDER_LEN)
        .map(char::from)
        .collect();
    Zeroizing::new(generated)
}
