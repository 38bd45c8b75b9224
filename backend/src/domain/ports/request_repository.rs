//! Port abstraction for blood-request persistence adapters.
//!
//! The transition mutation is a single conditional update: "set the new
//! status where the current status is still `pending`". Adapters must apply
//! it atomically so two racing transitions produce exactly one winner; the
//! loser observes `None` and the service re-reads to explain why.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::blood_group::BloodGroup;
use crate::domain::ids::{RequestId, UserId};
use crate::domain::request::{BankResponse, BloodRequest, RequestStatus};

use super::macros::define_store_error;

define_store_error! {
    /// Persistence errors raised by request repository adapters.
    pub enum RequestStoreError {
        /// Repository connection could not be established.
        Connection(connection) => "request store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query(query) => "request store query failed: {message}",
    }
}

/// Listing filter for the public request feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub blood_group: Option<BloodGroup>,
}

/// The mutation applied when a transition is authorised.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    /// Status being written.
    pub status: RequestStatus,
    /// New `updated_at` stamp.
    pub updated_at: DateTime<Utc>,
    /// Populated for bank actions; `None` for owner cancellations.
    pub bank_response: Option<BankResponse>,
}

/// Driven port for blood-request storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodRequestRepository: Send + Sync {
    /// Insert a freshly opened request.
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestStoreError>;

    /// Fetch a request by identifier.
    async fn find_by_id(&self, id: RequestId) -> Result<Option<BloodRequest>, RequestStoreError>;

    /// Requests matching `filter`, newest first.
    async fn list(&self, filter: RequestFilter) -> Result<Vec<BloodRequest>, RequestStoreError>;

    /// Requests owned by `requester`, newest first.
    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, RequestStoreError>;

    /// Atomically apply `record` to `id` provided the request is still
    /// `pending`. When the record carries a bank response, the responding
    /// bank is also linked as the request's blood bank.
    ///
    /// Returns the updated request, or `None` when the request does not
    /// exist or has already left `pending` (the caller distinguishes the two
    /// by re-reading).
    async fn complete_transition(
        &self,
        id: RequestId,
        record: TransitionRecord,
    ) -> Result<Option<BloodRequest>, RequestStoreError>;
}
