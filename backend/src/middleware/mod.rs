//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns. The trace identifier
//! attached to every request and response, CORS for the JSON API, and the
//! security headers on every response.

pub mod cors;
pub mod security;
pub mod trace;

pub use cors::{CorsPolicy, api_cors};
pub use security::security_headers;
pub use trace::Trace;
