//! Service entry-point: loads settings, prepares the database and serves the
//! HTTP API.

mod server;

use std::sync::Arc;

use mockable::{Clock, DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use userdesk::domain::UserService;
use userdesk::inbound::http::state::HttpState;
use userdesk::outbound::persistence::{DieselUserRepository, SqliteStore, StoreConfig};
use userdesk::outbound::rate_limit::InMemoryRateLimiter;
use userdesk::settings::{dockerenv_present, settings_from_env};

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = settings_from_env(&DefaultEnv::new(), dockerenv_present())
        .map_err(std::io::Error::other)?;
    if settings.debug && settings.containerised {
        warn!("DEBUG ignored inside a container");
    }
    if settings.allowed_origins.is_empty() {
        warn!("ALLOWED_ORIGINS is empty; browsers on other origins cannot call the API");
    }

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = SqliteStore::new(StoreConfig::new(&settings.db_path));
    let report = store
        .bootstrap(clock.utc())
        .await
        .map_err(std::io::Error::other)?;
    info!(
        path = %settings.db_path.display(),
        seeded = report.seeded,
        "database ready"
    );

    let users = UserService::new(Arc::new(DieselUserRepository::new(store)), Arc::clone(&clock));
    let limiter = Arc::new(InMemoryRateLimiter::new(Arc::clone(&clock)));
    let state = HttpState::new(users, limiter, clock).with_stats_options(settings.stats_options());

    let config = ServerConfig::from_settings(&settings);
    info!(
        addr = %config.bind_addr(),
        dev_mode = settings.dev_mode(),
        containerised = settings.containerised,
        content_security_policy = settings.containerised,
        "starting server"
    );
    create_server(state, config)?.await
}
