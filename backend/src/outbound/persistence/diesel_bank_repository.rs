//! PostgreSQL-backed [`BankRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::auth::EmailAddress;
use crate::domain::blood_bank::BloodBankAccount;
use crate::domain::ids::BankId;
use crate::domain::ports::{BankRepository, BankStoreError};

use super::error_mapping::{map_diesel_error, map_insert_error, map_pool_error};
use super::models::BankRow;
use super::pool::{DbPool, PoolError};
use super::schema::blood_banks;

/// Diesel-backed implementation of the bank repository port.
#[derive(Clone)]
pub struct DieselBankRepository {
    pool: DbPool,
}

impl DieselBankRepository {
    /// Create a new repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BankStoreError {
    map_pool_error(error, BankStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BankStoreError {
    map_diesel_error(error, BankStoreError::query, BankStoreError::connection)
}

fn insert_error(error: diesel::result::Error) -> BankStoreError {
    map_insert_error(
        error,
        BankStoreError::query,
        BankStoreError::connection,
        BankStoreError::duplicate,
    )
}

fn conversion_error(message: String) -> BankStoreError {
    BankStoreError::query(message)
}

#[async_trait]
impl BankRepository for DieselBankRepository {
    async fn insert(&self, bank: &BloodBankAccount) -> Result<(), BankStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = BankRow::from_domain(bank).map_err(conversion_error)?;
        diesel::insert_into(blood_banks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(insert_error)
    }

    async fn find_by_id(&self, id: BankId) -> Result<Option<BloodBankAccount>, BankStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = blood_banks::table
            .filter(blood_banks::id.eq(id.as_uuid()))
            .select(BankRow::as_select())
            .first::<BankRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<BloodBankAccount>, BankStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = blood_banks::table
            .filter(blood_banks::email.eq(email.as_str()))
            .select(BankRow::as_select())
            .first::<BankRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<BloodBankAccount>, BankStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BankRow> = blood_banks::table
            .order(blood_banks::created_at.asc())
            .select(BankRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_map_to_duplicates() {
        let unique = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("blood_banks_license_number_key".to_owned()),
        );
        assert!(matches!(
            insert_error(unique),
            BankStoreError::Duplicate { .. }
        ));
    }
}
