//! Diesel table definitions for the SQLite store.
//!
//! These must match the DDL issued by [`super::connection::SqliteStore::bootstrap`].

diesel::table! {
    /// User records.
    ///
    /// `id` is an SQLite `INTEGER PRIMARY KEY AUTOINCREMENT`, so identifiers
    /// are never reused after deletion. `email` carries a unique index.
    users (id) {
        /// Primary key assigned by the store.
        id -> BigInt,
        /// Sanitised display name (2-100 characters).
        name -> Text,
        /// Unique email address.
        email -> Text,
        /// Creation time in UTC, written once.
        created_at -> Timestamp,
    }
}
