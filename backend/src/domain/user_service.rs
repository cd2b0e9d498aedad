//! User management use-cases.
//!
//! The service composes the validator and the repository port. It owns the
//! order of checks for each operation and turns repository outcomes into
//! client-safe [`Error`] values; storage failures are logged here with their
//! detail and reach callers only as a generic per-operation message.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use tracing::{error, info};

use crate::domain::ports::{CreateOutcome, UpdateOutcome, UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, Error, NewUser, User, UserChanges, UserId, UserName, UserValidationError,
};

pub(crate) const USER_NOT_FOUND: &str = "User not found";
pub(crate) const EMAIL_TAKEN: &str = "This email is already in use";
pub(crate) const NOTHING_TO_UPDATE: &str = "No valid data to update";
pub(crate) const INVALID_NAME: &str = "Invalid name. Use only letters, digits, spaces, hyphens, apostrophes and periods (2-100 characters)";
pub(crate) const INVALID_EMAIL: &str = "Invalid email format";
pub(crate) const INVALID_ID: &str = "Invalid ID";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::InvalidId => Error::invalid_request(INVALID_ID),
            UserValidationError::InvalidName => Error::invalid_request(INVALID_NAME),
            UserValidationError::InvalidEmail => Error::invalid_request(INVALID_EMAIL),
        }
    }
}

/// Raw partial update as received from a client.
///
/// Fields are untrusted; `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Switches for the stats operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsOptions {
    /// Include filesystem locations in the report.
    pub dev_mode: bool,
}

/// Store statistics returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub total_users: u64,
    pub database_size_mb: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_path: Option<String>,
}

/// Bytes to MiB, rounded to two decimals.
fn mebibytes(bytes: u64) -> f64 {
    let mib = bytes as f64 / BYTES_PER_MIB;
    (mib * 100.0).round() / 100.0
}

/// User service implementing list, get, create, update, delete and stats.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Create a new service over the given repository and clock.
    pub fn new(repo: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn storage_failure(
        operation: &'static str,
        public: &'static str,
    ) -> impl FnOnce(UserPersistenceError) -> Error {
        move |err| {
            error!(operation, error = %err, "user storage failed");
            Error::internal(public)
        }
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.repo
            .list()
            .await
            .map_err(Self::storage_failure("list_users", "Error while retrieving users"))
    }

    /// One user by id.
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::storage_failure("get_user", "Error while retrieving the user"))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Sanitise, validate and insert a new user.
    pub async fn create(&self, name: &str, email: &str) -> Result<User, Error> {
        let new_user = NewUser::parse(name, email)?;
        let outcome = self
            .repo
            .create(&new_user, self.clock.utc())
            .await
            .map_err(Self::storage_failure("create_user", "Error while creating the user"))?;
        match outcome {
            CreateOutcome::Created(user) => {
                info!(user_id = %user.id(), "user created");
                Ok(user)
            }
            CreateOutcome::EmailTaken => Err(Error::conflict(EMAIL_TAKEN)),
        }
    }

    /// Apply the supplied fields of `patch` to an existing user.
    ///
    /// Checks run in order: existence, name, email, email uniqueness, and
    /// finally whether anything was supplied at all.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, Error> {
        let on_storage_error =
            || Self::storage_failure("update_user", "Error while updating the user");

        self.repo
            .find_by_id(id)
            .await
            .map_err(on_storage_error())?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        let changes = UserChanges {
            name: patch.name.as_deref().map(UserName::parse).transpose()?,
            email: patch.email.as_deref().map(EmailAddress::parse).transpose()?,
        };

        if changes.is_empty() {
            return Err(Error::invalid_request(NOTHING_TO_UPDATE));
        }

        let outcome = self
            .repo
            .update(id, &changes)
            .await
            .map_err(on_storage_error())?;
        match outcome {
            UpdateOutcome::Updated(user) => {
                info!(user_id = %id, "user updated");
                Ok(user)
            }
            UpdateOutcome::NotFound => Err(Error::not_found(USER_NOT_FOUND)),
            UpdateOutcome::EmailTaken => Err(Error::conflict(EMAIL_TAKEN)),
        }
    }

    /// Hard-delete a user.
    pub async fn delete(&self, id: UserId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(Self::storage_failure("delete_user", "Error while deleting the user"))?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Row count and storage footprint.
    ///
    /// Filesystem locations are only reported in development mode.
    pub async fn stats(&self, options: StatsOptions) -> Result<StatsReport, Error> {
        let stats = self
            .repo
            .stats()
            .await
            .map_err(Self::storage_failure("stats", "Error while retrieving statistics"))?;

        let (database_path, server_path) = if options.dev_mode {
            (
                Some(display_path(std::path::absolute(&stats.location).ok(), &stats.location)),
                std::env::current_dir()
                    .ok()
                    .map(|dir| dir.display().to_string()),
            )
        } else {
            (None, None)
        };

        Ok(StatsReport {
            total_users: stats.total_users,
            database_size_mb: mebibytes(stats.size_bytes),
            timestamp: self.clock.utc(),
            database_path,
            server_path,
        })
    }
}

fn display_path(resolved: Option<PathBuf>, fallback: &std::path::Path) -> String {
    resolved
        .as_deref()
        .unwrap_or(fallback)
        .display()
        .to_string()
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
