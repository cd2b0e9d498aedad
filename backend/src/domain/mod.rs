//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: keep the user model, its validation rules, the rate-limit policy
//! and the service logic independent of HTTP and storage. Adapters talk to
//! the domain through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a client-safe message.
//! - User and its validated field types.
//! - UserService: list, get, create, update, delete and stats.

pub mod error;
pub mod ports;
pub mod rate_limit;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, NewUser, User, UserChanges, UserId, UserName, UserValidationError,
};
pub use self::user_service::{StatsOptions, StatsReport, UserPatch, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use userdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("User not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
