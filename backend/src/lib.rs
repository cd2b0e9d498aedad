//! User directory service library.
//!
//! The binary in `main.rs` wires these modules into an Actix server; tests
//! build the same application through [`inbound::http::configure`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
