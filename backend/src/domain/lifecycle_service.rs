//! Blood-request lifecycle use-cases.
//!
//! Transitions are decided by [`authorise_transition`] against a snapshot of
//! the request, then applied with the store's conditional update so a racing
//! second transition loses cleanly instead of overwriting the winner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::actor::Actor;
use crate::domain::error::Error;
use crate::domain::ids::{RequestId, UserId};
use crate::domain::ports::{
    BloodRequestRepository, Clock, RequestFilter, RequestLifecycle, RequestStoreError,
    TransitionRecord,
};
use crate::domain::request::{
    BankResponse, BloodRequest, RequestDraft, RequestStatus, TransitionDenied,
    authorise_transition,
};

fn map_store_error(error: RequestStoreError) -> Error {
    match error {
        RequestStoreError::Connection { message } => {
            Error::service_unavailable(format!("request store unavailable: {message}"))
        }
        RequestStoreError::Query { message } => {
            Error::internal(format!("request store error: {message}"))
        }
    }
}

fn map_transition_denied(denied: TransitionDenied) -> Error {
    match denied {
        TransitionDenied::NotOwner
        | TransitionDenied::BankTargetNotAllowed { .. }
        | TransitionDenied::OwnerTargetNotAllowed { .. } => Error::forbidden(denied.to_string()),
        TransitionDenied::AlreadyResolved { .. } => Error::invalid_request(denied.to_string()),
    }
}

fn request_not_found(id: RequestId) -> Error {
    Error::not_found(format!("request {id} not found"))
}

/// [`RequestLifecycle`] implementation over the request repository.
#[derive(Clone)]
pub struct RequestLifecycleService<R> {
    requests: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RequestLifecycleService<R> {
    /// Wire the service to its repository and clock.
    pub fn new(requests: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { requests, clock }
    }
}

#[async_trait]
impl<R> RequestLifecycle for RequestLifecycleService<R>
where
    R: BloodRequestRepository,
{
    async fn open_request(
        &self,
        requester: UserId,
        draft: RequestDraft,
    ) -> Result<BloodRequest, Error> {
        let request = BloodRequest::open(RequestId::random(), requester, draft, self.clock.now());
        self.requests
            .insert(&request)
            .await
            .map_err(map_store_error)?;
        info!(request = %request.id, owner = %requester, "opened blood request");
        Ok(request)
    }

    async fn list_requests(&self, filter: RequestFilter) -> Result<Vec<BloodRequest>, Error> {
        self.requests.list(filter).await.map_err(map_store_error)
    }

    async fn list_requests_for(&self, requester: UserId) -> Result<Vec<BloodRequest>, Error> {
        self.requests
            .list_by_requester(requester)
            .await
            .map_err(map_store_error)
    }

    async fn apply_status_change(
        &self,
        id: RequestId,
        actor: Actor,
        target: RequestStatus,
    ) -> Result<BloodRequest, Error> {
        let request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| request_not_found(id))?;

        authorise_transition(&request, &actor, target).map_err(map_transition_denied)?;

        let now = self.clock.now();
        let bank_response = match &actor {
            Actor::BloodBank { id: bank } => Some(BankResponse {
                status: target,
                responded_by: *bank,
                responded_at: now,
                note: None,
            }),
            Actor::Individual { .. } => None,
        };
        let record = TransitionRecord {
            status: target,
            updated_at: now,
            bank_response,
        };

        match self
            .requests
            .complete_transition(id, record)
            .await
            .map_err(map_store_error)?
        {
            Some(updated) => {
                info!(request = %id, status = %target, "blood request transitioned");
                Ok(updated)
            }
            // Lost a race with another transition; re-read so the refusal
            // names the state that actually won.
            None => match self
                .requests
                .find_by_id(id)
                .await
                .map_err(map_store_error)?
            {
                Some(current) => Err(map_transition_denied(TransitionDenied::AlreadyResolved {
                    current: current.status,
                })),
                None => Err(request_not_found(id)),
            },
        }
    }
}
