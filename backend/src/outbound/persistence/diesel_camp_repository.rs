//! PostgreSQL-backed [`CampRepository`] implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::camp::{CampStatus, DonationCamp};
use crate::domain::ids::CampId;
use crate::domain::ports::{CampFilter, CampRepository, CampStoreError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::CampRow;
use super::pool::{DbPool, PoolError};
use super::schema::donation_camps;

/// Diesel-backed implementation of the camp repository port.
#[derive(Clone)]
pub struct DieselCampRepository {
    pool: DbPool,
}

impl DieselCampRepository {
    /// Create a new repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CampStoreError {
    map_pool_error(error, CampStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CampStoreError {
    map_diesel_error(error, CampStoreError::query, CampStoreError::connection)
}

fn conversion_error(message: String) -> CampStoreError {
    CampStoreError::query(message)
}

#[async_trait]
impl CampRepository for DieselCampRepository {
    async fn insert(&self, camp: &DonationCamp) -> Result<(), CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = CampRow::from_domain(camp).map_err(conversion_error)?;
        diesel::insert_into(donation_camps::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, camp: &DonationCamp) -> Result<(), CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = CampRow::from_domain(camp).map_err(conversion_error)?;
        diesel::update(donation_camps::table.filter(donation_camps::id.eq(camp.id.as_uuid())))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: CampId) -> Result<Option<DonationCamp>, CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = donation_camps::table
            .filter(donation_camps::id.eq(id.as_uuid()))
            .select(CampRow::as_select())
            .first::<CampRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn delete(&self, id: CampId) -> Result<bool, CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted =
            diesel::delete(donation_camps::table.filter(donation_camps::id.eq(id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(
        &self,
        filter: CampFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DonationCamp>, CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = donation_camps::table
            .order(donation_camps::date.asc())
            .select(CampRow::as_select())
            .into_boxed();
        if let Some(city) = &filter.city {
            query = query.filter(donation_camps::city.ilike(format!("%{city}%")));
        }
        if let Some(status) = filter.status {
            query = query.filter(donation_camps::status.eq(status.as_str()));
        }
        if filter.upcoming_only {
            query = query
                .filter(donation_camps::date.ge(now))
                .filter(donation_camps::status.eq(CampStatus::Scheduled.as_str()));
        }
        let rows: Vec<CampRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<DonationCamp>, CampStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CampRow> = donation_camps::table
            .order(donation_camps::created_at.asc())
            .select(CampRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }
}
