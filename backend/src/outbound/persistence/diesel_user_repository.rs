//! PostgreSQL-backed [`UserRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::auth::EmailAddress;
use crate::domain::blood_group::BloodGroup;
use crate::domain::ids::UserId;
use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::user::UserAccount;

use super::error_mapping::{map_diesel_error, map_insert_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserStoreError {
    map_pool_error(error, UserStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserStoreError {
    map_diesel_error(error, UserStoreError::query, UserStoreError::connection)
}

fn insert_error(error: diesel::result::Error) -> UserStoreError {
    map_insert_error(
        error,
        UserStoreError::query,
        UserStoreError::connection,
        UserStoreError::duplicate,
    )
}

fn conversion_error(message: String) -> UserStoreError {
    UserStoreError::query(message)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &UserAccount) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = UserRow::from_domain(user).map_err(conversion_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(insert_error)
    }

    async fn update(&self, user: &UserAccount) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = UserRow::from_domain(user).map_err(conversion_error)?;
        diesel::update(users::table.filter(users::id.eq(user.id.as_uuid())))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row.into_domain().map_err(conversion_error))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserAccount>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }

    async fn list_available_donors(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<UserAccount>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = users::table
            .filter(users::is_donor.eq(true))
            .filter(users::is_available.eq(true))
            .select(UserRow::as_select())
            .into_boxed();
        if let Some(group) = blood_group {
            query = query.filter(users::blood_group.eq(group.as_str()));
        }
        let rows: Vec<UserRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(conversion_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping edges; behaviour against a live database is covered by
    //! the deployment's migration checks.

    use super::*;

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let mapped = pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, UserStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[test]
    fn unique_violations_map_to_duplicates() {
        let unique = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        let mapped = insert_error(unique);
        assert!(matches!(mapped, UserStoreError::Duplicate { .. }));
    }

    #[test]
    fn other_database_errors_stay_query_errors() {
        let mapped = diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, UserStoreError::Query { .. }));
    }
}
