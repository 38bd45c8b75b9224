//! PostgreSQL-backed [`BloodRequestRepository`] implementation using Diesel.
//!
//! The transition mutation is a single `UPDATE ... WHERE id = $1 AND status
//! = 'pending' RETURNING *`, so concurrent transitions on the same request
//! resolve to exactly one winner inside the database.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ids::{RequestId, UserId};
use crate::domain::ports::{
    BloodRequestRepository, RequestFilter, RequestStoreError, TransitionRecord,
};
use crate::domain::request::{BloodRequest, RequestStatus};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::BloodRequestRow;
use super::pool::{DbPool, PoolError};
use super::schema::blood_requests;

/// Diesel-backed implementation of the request repository port.
#[derive(Clone)]
pub struct DieselRequestRepository {
    pool: DbPool,
}

impl DieselRequestRepository {
    /// Create a new repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RequestStoreError {
    map_pool_error(error, RequestStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RequestStoreError {
    map_diesel_error(
        error,
        RequestStoreError::query,
        RequestStoreError::connection,
    )
}

fn conversion_error(message: String) -> RequestStoreError {
    RequestStoreError::query(message)
}

#[async_trait]
impl BloodRequestRepository for DieselRequestRepository {
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = BloodRequestRow::from_domain(request).map_err(conversion_error)?;
        diesel::insert_into(blood_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<BloodRequest>, RequestStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = blood_requests::table
            .filter(blood_requests::id.eq(id.as_uuid()))
            .select(BloodRequestRow::as_select())
            .first::<BloodRequestRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn list(&self, filter: RequestFilter) -> Result<Vec<BloodRequest>, RequestStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = blood_requests::table
            .order(blood_requests::created_at.desc())
            .select(BloodRequestRow::as_select())
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(blood_requests::status.eq(status.as_str()));
        }
        if let Some(group) = filter.blood_group {
            query = query.filter(blood_requests::blood_group.eq(group.as_str()));
        }
        let rows: Vec<BloodRequestRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }

    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, RequestStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BloodRequestRow> = blood_requests::table
            .filter(blood_requests::requested_by.eq(requester.as_uuid()))
            .order(blood_requests::created_at.desc())
            .select(BloodRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }

    async fn complete_transition(
        &self,
        id: RequestId,
        record: TransitionRecord,
    ) -> Result<Option<BloodRequest>, RequestStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let bank_response = record
            .bank_response
            .as_ref()
            .map(|response| {
                serde_json::to_value(response)
                    .map_err(|err| conversion_error(format!("serialise bank_response: {err}")))
            })
            .transpose()?;
        let responding_bank = record
            .bank_response
            .as_ref()
            .map(|response| *response.responded_by.as_uuid());

        let row = diesel::update(
            blood_requests::table
                .filter(blood_requests::id.eq(id.as_uuid()))
                .filter(blood_requests::status.eq(RequestStatus::Pending.as_str())),
        )
        .set((
            blood_requests::status.eq(record.status.as_str().to_owned()),
            blood_requests::updated_at.eq(record.updated_at),
            blood_requests::bank_response.eq(bank_response),
            blood_requests::blood_bank.eq(responding_bank),
        ))
        .get_result::<BloodRequestRow>(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;

        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }
}
