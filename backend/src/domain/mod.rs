//! Domain entities, value types, and use-case services.
//!
//! Types here are transport- and storage-agnostic: validated constructors at
//! the edges, invariants documented on each aggregate, serde only for the
//! value objects that travel as JSON documents. Inbound adapters talk to the
//! driving ports in [`ports`]; outbound adapters implement the driven ones.

pub mod actor;
pub mod auth;
pub mod blood_bank;
pub mod blood_group;
pub mod camp;
pub mod error;
pub mod geo;
pub mod ids;
pub mod password;
pub mod ports;
pub mod request;
pub mod token;
pub mod user;

mod account_service;
mod camp_service;
mod lifecycle_service;
mod profile_service;
mod report_service;

pub use account_service::AccountServiceImpl;
pub use actor::{Actor, ActorKind};
pub use auth::{
    AuthValidationError, BankRegistration, EmailAddress, FederatedIdentity, LoginCredentials,
    NewRegistration,
};
pub use blood_bank::{BloodBankAccount, Inventory, InventoryLevel, OperatingHours};
pub use blood_group::{BloodGroup, BloodGroupParseError};
pub use camp::{
    CampDraft, CampPatch, CampRegistration, CampStatus, CampValidationError, DonationCamp,
};
pub use camp_service::CampServiceImpl;
pub use error::{Error, ErrorCode};
pub use geo::{GeoPoint, Proximity};
pub use ids::{BankId, CampId, RequestId, UserId};
pub use lifecycle_service::RequestLifecycleService;
pub use password::{PasswordHash, hash_password, verify_password};
pub use profile_service::ProfileServiceImpl;
pub use report_service::ReportServiceImpl;
pub use request::{
    BankResponse, BloodRequest, RequestDraft, RequestStatus, RequestValidationError,
    TransitionDenied, Urgency, authorise_transition,
};
pub use token::{Claims, SignedToken, TokenError, TokenIssuer};
pub use user::{
    Address, DonorProfile, ProfileUpdate, Role, UserAccount,
};

/// Convenient result alias for domain use-cases.
pub type ApiResult<T> = Result<T, Error>;
