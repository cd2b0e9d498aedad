//! HTTP inbound adapter exposing REST endpoints.
//!
//! ```text
//! GET /             console page
//! /api              JSON API, CORS applied
//!   GET  /health
//!   GET  /stats
//!   ...  /users     see [`users`]
//! ```

pub mod body;
pub mod console;
pub mod error;
pub mod health;
pub mod rate_limit;
pub mod state;
pub mod stats;
pub mod users;

use actix_web::{HttpResponse, web};

pub use error::ApiResult;

use crate::domain::Error;
use crate::middleware::{CorsPolicy, api_cors};

const RESOURCE_NOT_FOUND: &str = "Resource not found";

/// Fallback for unmatched paths and methods.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found(RESOURCE_NOT_FOUND))
}

/// Register every route, the `/api` CORS layer and the JSON 404 fallback.
///
/// [`state::HttpState`] must be registered as app data separately so the
/// caller controls its lifetime.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userdesk::inbound::http::configure;
/// use userdesk::middleware::CorsPolicy;
///
/// let app = App::new().configure(configure(CorsPolicy::from_list("http://localhost:*")));
/// ```
pub fn configure(cors: CorsPolicy) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(console::console)
            .service(
                web::scope("/api")
                    .wrap(api_cors(cors))
                    .service(health::health)
                    .service(stats::stats)
                    .service(users::list_users)
                    .service(users::get_user)
                    .service(users::create_user)
                    .service(users::update_user)
                    .service(users::delete_user),
            )
            .default_service(web::to(not_found));
    }
}
