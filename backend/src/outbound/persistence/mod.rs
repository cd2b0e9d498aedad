//! SQLite persistence adapters using Diesel.
//!
//! The layer follows these principles:
//!
//! - **Thin adapters**: the repository translates between Diesel rows and
//!   domain types. No business rules live here.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Scoped connections**: each operation opens and drops its own
//!   connection through [`SqliteStore`].
//! - **Strongly typed errors**: Diesel failures are mapped to
//!   `UserPersistenceError` with driver text logged, not returned.
//!
//! # Example
//!
//! ```no_run
//! use userdesk::outbound::persistence::{DieselUserRepository, SqliteStore, StoreConfig};
//!
//! # async fn demo() -> Result<(), userdesk::outbound::persistence::StoreError> {
//! let store = SqliteStore::new(StoreConfig::new("test.db"));
//! store.bootstrap(chrono::Utc::now()).await?;
//! let repo = DieselUserRepository::new(store);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod connection;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod schema;

pub use connection::{BootstrapReport, SqliteConn, SqliteStore, StoreConfig, StoreError};
pub use diesel_user_repository::DieselUserRepository;
