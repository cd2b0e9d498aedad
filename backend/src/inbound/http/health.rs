//! Liveness endpoint.
//!
//! Counts against the global budgets only; it has no budget of its own.

use actix_web::{HttpRequest, HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::rate_limit::Operation;
use crate::inbound::http::ApiResult;

use super::rate_limit::admit;
use super::state::HttpState;

/// Service name reported by the health probe.
pub const SERVICE_NAME: &str = "userdesk";

/// Body returned by `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

/// Report that the process is up.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userdesk::inbound::http::health::health;
///
/// let app = App::new().service(health);
/// ```
#[get("/health")]
pub async fn health(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    admit(&state, &req, Operation::Health).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthReport {
            status: "healthy",
            timestamp: state.clock.utc(),
            service: SERVICE_NAME,
        }))
}
