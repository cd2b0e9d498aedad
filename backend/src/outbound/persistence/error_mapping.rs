//! Mapping from Diesel and store failures to user persistence errors.
//!
//! Driver messages are logged at `debug` and replaced with fixed text so
//! nothing engine-specific crosses the port.

use tracing::debug;

use crate::domain::ports::UserPersistenceError;

use super::connection::StoreError;

/// Map store errors to connection failures.
pub(super) fn map_store_error(error: StoreError) -> UserPersistenceError {
    match error {
        StoreError::Open { message } | StoreError::Bootstrap { message } => {
            UserPersistenceError::connection(message)
        }
        StoreError::Inspect { message } => UserPersistenceError::query(message),
    }
}

/// Map Diesel errors to query or connection failures.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::query("unique constraint violated")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// True when the error is the unique index on `email` rejecting a write.
pub(super) fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::UniqueViolation, _)
    )
}
