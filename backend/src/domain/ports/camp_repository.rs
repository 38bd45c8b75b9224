//! Port abstraction for donation-camp persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::camp::{CampStatus, DonationCamp};
use crate::domain::ids::CampId;

use super::macros::define_store_error;

define_store_error! {
    /// Persistence errors raised by camp repository adapters.
    pub enum CampStoreError {
        /// Repository connection could not be established.
        Connection(connection) => "camp store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query(query) => "camp store query failed: {message}",
    }
}

/// Listing filter for the public camp feed.
///
/// - `city` matches case-insensitively on a substring.
/// - `status` matches exactly.
/// - `upcoming_only` keeps scheduled camps dated on or after `now`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampFilter {
    pub city: Option<String>,
    pub status: Option<CampStatus>,
    pub upcoming_only: bool,
}

/// Driven port for donation-camp storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampRepository: Send + Sync {
    /// Insert a freshly opened camp.
    async fn insert(&self, camp: &DonationCamp) -> Result<(), CampStoreError>;

    /// Replace an existing camp record.
    async fn update(&self, camp: &DonationCamp) -> Result<(), CampStoreError>;

    /// Fetch a camp by identifier.
    async fn find_by_id(&self, id: CampId) -> Result<Option<DonationCamp>, CampStoreError>;

    /// Delete a camp, returning whether it existed.
    async fn delete(&self, id: CampId) -> Result<bool, CampStoreError>;

    /// Camps matching `filter`, soonest first. `now` anchors the
    /// `upcoming_only` cut-off.
    async fn list(
        &self,
        filter: CampFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DonationCamp>, CampStoreError>;

    /// Every camp, for reporting.
    async fn list_all(&self) -> Result<Vec<DonationCamp>, CampStoreError>;
}
