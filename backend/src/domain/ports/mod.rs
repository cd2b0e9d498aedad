//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod rate_limiter;
mod user_repository;

pub use rate_limiter::{Decision, RateLimiter};
#[cfg(test)]
pub use rate_limiter::{MockRateLimiter, UnlimitedRateLimiter};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    CreateOutcome, StorageStats, UpdateOutcome, UserPersistenceError, UserRepository,
};
