//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AccountService`, `ProfileService`, `RequestLifecycle`,
//! `CampService`, `ReportService`) are consumed by inbound adapters; driven
//! ports (`*Repository`, `Clock`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_store_error;

mod account_service;
mod bank_repository;
mod camp_repository;
mod camp_service;
mod clock;
mod profile_service;
mod report_service;
mod request_lifecycle;
mod request_repository;
mod user_repository;

pub use account_service::{AccountService, AuthSession, BankSession};
pub use bank_repository::{BankRepository, BankStoreError};
pub use camp_repository::{CampFilter, CampRepository, CampStoreError};
pub use camp_service::CampService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use profile_service::{DonorSearch, ProfileService};
pub use report_service::{
    BankReportRow, CampReportRow, ReportService, RequestReportRow, UserReportRow,
};
pub use request_lifecycle::RequestLifecycle;
#[cfg(test)]
pub use request_repository::MockBloodRequestRepository;
pub use request_repository::{
    BloodRequestRepository, RequestFilter, RequestStoreError, TransitionRecord,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserStoreError};
