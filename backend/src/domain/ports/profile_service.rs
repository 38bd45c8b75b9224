//! Driving port for profile and donor-directory use-cases.

use async_trait::async_trait;

use crate::domain::blood_group::BloodGroup;
use crate::domain::error::Error;
use crate::domain::geo::Proximity;
use crate::domain::ids::UserId;
use crate::domain::user::{DonorProfile, ProfileUpdate, UserAccount};

/// Donor directory query: optional group filter plus optional proximity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DonorSearch {
    pub blood_group: Option<BloodGroup>,
    pub near: Option<Proximity>,
}

/// Domain use-case port for the profile surface.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetch the caller's own account.
    async fn fetch_profile(&self, id: UserId) -> Result<UserAccount, Error>;

    /// Apply a partial profile update and return the result.
    async fn update_profile(&self, id: UserId, update: ProfileUpdate)
    -> Result<UserAccount, Error>;

    /// Store the donor questionnaire, marking the account a donor.
    async fn submit_donor_profile(
        &self,
        id: UserId,
        profile: DonorProfile,
    ) -> Result<UserAccount, Error>;

    /// Available donors matching the search, nearest first when a proximity
    /// filter is given.
    async fn search_donors(&self, search: DonorSearch) -> Result<Vec<UserAccount>, Error>;
}
