//! Request body reading for JSON handlers.
//!
//! Bodies are read inside the handler, after rate-limit admission and path
//! validation, rather than by an extractor that would run first.

use actix_web::web;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::debug;

use crate::domain::Error;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub(crate) const INVALID_JSON: &str = "Invalid JSON payload";
pub(crate) const BODY_TOO_LARGE: &str = "Request body too large";

/// Read the whole body and parse it as JSON.
///
/// Returns `None` for an empty (or whitespace-only) body.
///
/// # Errors
///
/// Returns an invalid-request [`Error`] when the body exceeds `limit`
/// bytes, the stream fails, or the content is not JSON.
pub async fn read_json(mut payload: web::Payload, limit: usize) -> Result<Option<Value>, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            debug!(error = %err, "request body stream failed");
            Error::invalid_request(INVALID_JSON)
        })?;
        if body.len() + chunk.len() > limit {
            return Err(Error::invalid_request(BODY_TOO_LARGE));
        }
        body.extend_from_slice(&chunk);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|err| {
            debug!(error = %err, "request body is not JSON");
            Error::invalid_request(INVALID_JSON)
        })
}
