//! Driving port for the blood-request lifecycle.
//!
//! This is the single entry point for status transitions: the tagged actor
//! from the gate goes in, the rules of
//! [`crate::domain::request::authorise_transition`] decide, and the store's
//! conditional update applies the result. There is no unguarded update path.

use async_trait::async_trait;

use crate::domain::actor::Actor;
use crate::domain::error::Error;
use crate::domain::ids::{RequestId, UserId};
use crate::domain::request::{BloodRequest, RequestDraft, RequestStatus};

pub use super::request_repository::RequestFilter;

/// Domain use-case port for blood requests.
#[async_trait]
pub trait RequestLifecycle: Send + Sync {
    /// Open a new pending request owned by `requester`.
    async fn open_request(
        &self,
        requester: UserId,
        draft: RequestDraft,
    ) -> Result<BloodRequest, Error>;

    /// Public feed of requests, newest first.
    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<BloodRequest>, Error>;

    /// Requests owned by `requester`, newest first.
    async fn list_requests_for(&self, requester: UserId) -> Result<Vec<BloodRequest>, Error>;

    /// Apply a status transition on behalf of `actor` per the lifecycle
    /// rules, returning the updated request.
    async fn apply_status_change(
        &self,
        id: RequestId,
        actor: Actor,
        target: RequestStatus,
    ) -> Result<BloodRequest, Error>;
}
