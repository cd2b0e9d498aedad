//! SQLite-backed `UserRepository` implementation using Diesel.
//!
//! Each method opens its own connection and lets it drop before returning.
//! Email uniqueness is decided by the unique index on `email`: writes are
//! single statements returning the stored row, and a constraint violation
//! becomes `EmailTaken`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use crate::domain::ports::{
    CreateOutcome, StorageStats, UpdateOutcome, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, NewUser, User, UserChanges, UserId, UserName};

use super::connection::{SqliteConn, SqliteStore};
use super::error_mapping::{is_unique_violation, map_diesel_error, map_store_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
///
/// # Examples
///
/// ```no_run
/// use userdesk::domain::ports::UserRepository;
/// use userdesk::outbound::persistence::{DieselUserRepository, SqliteStore, StoreConfig};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new(StoreConfig::new("users.db"));
/// let repo = DieselUserRepository::new(store);
/// let users = repo.list().await?;
/// println!("{} users", users.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DieselUserRepository {
    store: SqliteStore,
}

impl DieselUserRepository {
    /// Create a new repository over the given store.
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    async fn connect(&self) -> Result<SqliteConn, UserPersistenceError> {
        self.store.connect().await.map_err(map_store_error)
    }
}

/// Convert a row to a domain user.
///
/// Stored values are reported as they are; rows written by other tools
/// need not meet the current input rules.
fn row_to_user(row: UserRow) -> User {
    User::new(
        UserId::from_stored(row.id),
        UserName::from_stored(row.name),
        EmailAddress::from_stored(row.email),
        row.created_at.and_utc(),
    )
}

async fn find_row(conn: &mut SqliteConn, id: i64) -> QueryResult<Option<UserRow>> {
    users::table
        .find(id)
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.connect().await?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.desc(), users::id.desc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.connect().await?;

        let row = find_row(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn create(
        &self,
        user: &NewUser,
        created_at: DateTime<Utc>,
    ) -> Result<CreateOutcome, UserPersistenceError> {
        let mut conn = self.connect().await?;
        let new_row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            created_at: created_at.naive_utc(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await;
        match inserted {
            Ok(row) => Ok(CreateOutcome::Created(row_to_user(row))),
            Err(err) if is_unique_violation(&err) => Ok(CreateOutcome::EmailTaken),
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<UpdateOutcome, UserPersistenceError> {
        let mut conn = self.connect().await?;
        let changeset = UserChangeset {
            name: changes.name.as_ref().map(AsRef::as_ref),
            email: changes.email.as_ref().map(AsRef::as_ref),
        };

        let updated = diesel::update(users::table.find(id.get()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional();
        match updated {
            Ok(Some(row)) => Ok(UpdateOutcome::Updated(row_to_user(row))),
            Ok(None) => Ok(UpdateOutcome::NotFound),
            Err(err) if is_unique_violation(&err) => Ok(UpdateOutcome::EmailTaken),
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.connect().await?;

        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn stats(&self) -> Result<StorageStats, UserPersistenceError> {
        let mut conn = self.connect().await?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        drop(conn);

        let size_bytes = self.store.file_size().map_err(map_store_error)?;

        Ok(StorageStats {
            total_users: u64::try_from(total).unwrap_or_default(),
            size_bytes,
            location: self.store.path().to_path_buf(),
        })
    }
}
