//! The authenticated principal behind a request.
//!
//! The bearer gate decodes a token into an [`Actor`] exactly once; services
//! receive the tagged value and never re-inspect raw claims.

use super::ids::{BankId, UserId};
use super::user::Role;

/// Which table an identity lives in, as encoded in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActorKind {
    #[serde(rename = "user")]
    Individual,
    #[serde(rename = "bloodbank")]
    BloodBank,
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Individual => f.write_str("user"),
            Self::BloodBank => f.write_str("bloodbank"),
        }
    }
}

/// An authenticated identity, decided once at the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// An individual user account, with its role.
    Individual { id: UserId, role: Role },
    /// A blood-bank account.
    BloodBank { id: BankId },
}

impl Actor {
    /// The kind tag carried in token claims.
    pub const fn kind(&self) -> ActorKind {
        match self {
            Self::Individual { .. } => ActorKind::Individual,
            Self::BloodBank { .. } => ActorKind::BloodBank,
        }
    }

    /// Whether this actor is an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Individual {
                role: Role::Admin,
                ..
            }
        )
    }
}
