//! Driving port for donation-camp use-cases.

use async_trait::async_trait;

use crate::domain::camp::{CampDraft, CampPatch, DonationCamp};
use crate::domain::error::Error;
use crate::domain::ids::{BankId, CampId, UserId};

pub use super::camp_repository::CampFilter;

/// Domain use-case port for camps.
#[async_trait]
pub trait CampService: Send + Sync {
    /// Public camp feed, soonest first.
    async fn list_camps(&self, filter: CampFilter) -> Result<Vec<DonationCamp>, Error>;

    /// Fetch one camp.
    async fn fetch_camp(&self, id: CampId) -> Result<DonationCamp, Error>;

    /// Create a camp organised by `organizer`.
    async fn create_camp(&self, organizer: BankId, draft: CampDraft)
    -> Result<DonationCamp, Error>;

    /// Update a camp; only the organising bank may do so.
    async fn update_camp(
        &self,
        organizer: BankId,
        id: CampId,
        patch: CampPatch,
    ) -> Result<DonationCamp, Error>;

    /// Delete a camp; only the organising bank may do so.
    async fn delete_camp(&self, organizer: BankId, id: CampId) -> Result<(), Error>;

    /// Register `donor` for a camp; double registration fails.
    async fn register_donor(&self, donor: UserId, id: CampId) -> Result<DonationCamp, Error>;
}
