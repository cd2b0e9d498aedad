//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: SQLite-backed user repository using Diesel.
//! - **rate_limit**: in-memory fixed-window rate limiter.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod rate_limit;
