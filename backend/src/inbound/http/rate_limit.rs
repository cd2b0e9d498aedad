//! Rate-limit admission for HTTP handlers.
//!
//! Every rate-limited handler calls [`admit`] before touching its input, so
//! a throttled client learns nothing about the request it sent.

use actix_web::HttpRequest;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::Decision;
use crate::domain::rate_limit::{ClientKey, Operation};

use super::state::HttpState;

pub(crate) const RATE_LIMITED: &str = "Too many requests. Please try again later.";

/// Client identity for rate limiting: the peer IP address.
pub fn client_key(req: &HttpRequest) -> ClientKey {
    req.peer_addr()
        .map_or_else(ClientKey::unknown, |addr| ClientKey::new(addr.ip().to_string()))
}

/// Count the request against every budget for `operation`.
///
/// # Errors
///
/// Returns a rate-limited [`Error`] carrying the retry hint when any budget
/// is exhausted.
pub async fn admit(state: &HttpState, req: &HttpRequest, operation: Operation) -> Result<(), Error> {
    let client = client_key(req);
    let budgets = state.policy.budgets_for(operation);
    match state.limiter.try_acquire(&client, &budgets).await {
        Decision::Allowed => Ok(()),
        Decision::Denied {
            budget,
            retry_after,
        } => {
            warn!(
                %client,
                %operation,
                %budget,
                retry_after_secs = retry_after.as_secs(),
                "rate limit exceeded"
            );
            Err(Error::rate_limited(RATE_LIMITED).with_retry_after(retry_after))
        }
    }
}
