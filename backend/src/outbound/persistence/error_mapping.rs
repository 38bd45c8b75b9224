//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection constructor.
pub fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
pub fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => {
            debug!(error = %other, "diesel operation failed");
        }
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Like [`map_diesel_error`], but routes unique-index violations into a
/// dedicated constructor so registration can answer with the duplicate
/// error instead of a 500.
pub fn map_insert_error<E, Q, C, D>(
    error: DieselError,
    query: Q,
    connection: C,
    duplicate: D,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
    D: FnOnce(String) -> E,
{
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return duplicate(info.message().to_owned());
    }
    map_diesel_error(error, query, connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserStoreError;

    #[test]
    fn pool_errors_become_connection_errors() {
        let mapped: UserStoreError =
            map_pool_error(PoolError::checkout("refused"), UserStoreError::connection);
        assert!(matches!(mapped, UserStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("refused"));
    }

    #[test]
    fn not_found_becomes_a_query_error() {
        let mapped: UserStoreError = map_diesel_error(
            DieselError::NotFound,
            UserStoreError::query,
            UserStoreError::connection,
        );
        assert!(matches!(mapped, UserStoreError::Query { .. }));
    }
}
