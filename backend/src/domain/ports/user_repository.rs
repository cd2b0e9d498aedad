//! Port abstraction for the user table and its errors.
//!
//! The repository is the only component that touches persistence. Each call
//! acquires and releases its own storage handle.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be opened.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Result of an insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Row written; carries the stored representation.
    Created(User),
    /// Another row already holds the email.
    EmailTaken,
}

/// Result of a partial update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Row written; carries the stored representation.
    Updated(User),
    /// No row has the requested id.
    NotFound,
    /// A different row already holds the requested email.
    EmailTaken,
}

/// Row count and on-disk footprint of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    pub total_users: u64,
    pub size_bytes: u64,
    /// Storage location as configured (may be relative).
    pub location: PathBuf,
}

/// Port for user persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a user unless the email is already taken.
    ///
    /// The unique index on `email` decides collisions; a violation is
    /// reported as [`CreateOutcome::EmailTaken`].
    async fn create(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<CreateOutcome, UserPersistenceError>;

    /// Write the supplied columns of an existing user.
    ///
    /// `changes` must contain at least one field.
    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<UpdateOutcome, UserPersistenceError>;

    /// Hard-delete a user. Returns `false` when no row had the id.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Row count and storage size.
    async fn stats(&self) -> Result<StorageStats, UserPersistenceError>;
}
