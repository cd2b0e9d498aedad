//! Scoped SQLite connections for the persistence layer.
//!
//! SQLite needs no pool: every repository operation opens its own
//! connection through [`SqliteStore::connect`] and drops it on every exit
//! path. Connections run on Tokio's blocking pool via `diesel-async`'s
//! `SyncConnectionWrapper`, so awaiting a query never stalls the executor.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, RunQueryDsl, SimpleAsyncConnection};
use tracing::{debug, info};

use super::models::NewUserRow;
use super::schema::users;

/// Async SQLite connection used by the adapters.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

const CREATE_SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email);";

const SEED_USERS: [(&str, &str); 3] = [
    ("Alice Dupont", "alice@example.com"),
    ("Bob Martin", "bob@example.com"),
    ("Claire Dubois", "claire@example.com"),
];

/// Errors raised while opening or preparing the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The database file could not be opened or configured.
    #[error("failed to open database: {message}")]
    Open { message: String },

    /// Schema creation or seeding failed.
    #[error("failed to bootstrap database: {message}")]
    Bootstrap { message: String },

    /// The database file could not be inspected.
    #[error("failed to inspect database file: {message}")]
    Inspect { message: String },
}

impl StoreError {
    /// Create an open error with the given message.
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
        }
    }

    /// Create a bootstrap error with the given message.
    pub fn bootstrap(message: impl Into<String>) -> Self {
        Self::Bootstrap {
            message: message.into(),
        }
    }

    /// Create an inspect error with the given message.
    pub fn inspect(message: impl Into<String>) -> Self {
        Self::Inspect {
            message: message.into(),
        }
    }
}

/// Configuration for the SQLite store.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use userdesk::outbound::persistence::StoreConfig;
///
/// let config = StoreConfig::new("users.db").with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.path().to_str(), Some("users.db"));
/// assert_eq!(config.busy_timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
    busy_timeout: Duration,
}

impl StoreConfig {
    /// Create a configuration for the database file at `path`.
    ///
    /// Waits up to five seconds on a locked database by default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Set how long a connection waits for a competing writer.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Database file location as configured.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock wait applied to every connection.
    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

/// Outcome of [`SqliteStore::bootstrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Sample rows inserted; zero when the table already held data.
    pub seeded: usize,
}

/// Handle to the SQLite database file.
///
/// Cheap to clone; holds configuration only, never an open connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    config: Arc<StoreConfig>,
}

impl SqliteStore {
    /// Create a store handle for the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Database file location as configured.
    pub fn path(&self) -> &Path {
        self.config.path()
    }

    /// Open a fresh connection with the busy timeout applied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the file cannot be opened.
    pub async fn connect(&self) -> Result<SqliteConn, StoreError> {
        let url = self
            .path()
            .to_str()
            .ok_or_else(|| StoreError::open("database path is not valid UTF-8"))?;
        let mut conn = SqliteConn::establish(url)
            .await
            .map_err(|err| StoreError::open(err.to_string()))?;
        let pragma = format!(
            "PRAGMA busy_timeout = {};",
            self.config.busy_timeout().as_millis()
        );
        conn.batch_execute(&pragma)
            .await
            .map_err(|err| StoreError::open(err.to_string()))?;
        Ok(conn)
    }

    /// Create the schema if needed and seed sample users into an empty table.
    ///
    /// Safe to run on every start.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] or [`StoreError::Bootstrap`].
    pub async fn bootstrap(&self, seeded_at: DateTime<Utc>) -> Result<BootstrapReport, StoreError> {
        let mut conn = self.connect().await?;
        conn.batch_execute(CREATE_SCHEMA)
            .await
            .map_err(|err| StoreError::bootstrap(err.to_string()))?;

        let created_at = seeded_at.naive_utc();
        let seeded = conn
            .transaction(|conn| {
                async move {
                    let existing: i64 = users::table.count().get_result(conn).await?;
                    if existing > 0 {
                        return Ok(0);
                    }
                    let mut inserted = 0;
                    for (name, email) in SEED_USERS {
                        inserted += diesel::insert_into(users::table)
                            .values(NewUserRow {
                                name,
                                email,
                                created_at,
                            })
                            .execute(conn)
                            .await?;
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err: diesel::result::Error| StoreError::bootstrap(err.to_string()))?;

        if seeded > 0 {
            info!(rows = seeded, path = %self.path().display(), "seeded sample users");
        } else {
            debug!(path = %self.path().display(), "users table already populated");
        }
        Ok(BootstrapReport { seeded })
    }

    /// Size of the database file in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Inspect`] when the file cannot be read.
    pub fn file_size(&self) -> Result<u64, StoreError> {
        let path = self.path();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| StoreError::inspect("database path has no file name"))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| StoreError::inspect(err.to_string()))?;
        let metadata = dir
            .metadata(file_name)
            .map_err(|err| StoreError::inspect(err.to_string()))?;
        Ok(metadata.len())
    }
}
