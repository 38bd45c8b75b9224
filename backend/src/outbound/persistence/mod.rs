//! Diesel/PostgreSQL outbound adapters.

mod diesel_bank_repository;
mod diesel_camp_repository;
mod diesel_request_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
pub mod schema;

pub use diesel_bank_repository::DieselBankRepository;
pub use diesel_camp_repository::DieselCampRepository;
pub use diesel_request_repository::DieselRequestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
