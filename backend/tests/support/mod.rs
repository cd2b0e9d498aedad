//! Shared helpers for integration tests.
//!
//! Each test gets its own SQLite file in a temporary directory and a clock
//! it can move forward, so rate-limit windows roll over on demand.

use std::sync::{Arc, Mutex, PoisonError};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;

use userdesk::Trace;
use userdesk::domain::UserService;
use userdesk::inbound::http::configure;
use userdesk::inbound::http::state::HttpState;
use userdesk::middleware::{CorsPolicy, security_headers};
use userdesk::outbound::persistence::{DieselUserRepository, SqliteStore, StoreConfig};
use userdesk::outbound::rate_limit::InMemoryRateLimiter;

/// Clock whose time only moves when a test says so.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Five seconds into a minute window.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 5)
        .single()
        .expect("valid start time")
}

/// A bootstrapped database and the services built on it.
pub struct TestWorld {
    pub store: SqliteStore,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
    _dir: TempDir,
}

impl TestWorld {
    /// Fresh database seeded with the three sample users and a real rate
    /// limiter driven by the test clock.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SqliteStore::new(StoreConfig::new(dir.path().join("users.db")));
        let clock = Arc::new(MutableClock::new(start_time()));
        store.bootstrap(clock.utc()).await.expect("bootstrap");

        let shared_clock: Arc<dyn Clock> = clock.clone();
        let users = UserService::new(
            Arc::new(DieselUserRepository::new(store.clone())),
            Arc::clone(&shared_clock),
        );
        let limiter = Arc::new(InMemoryRateLimiter::new(Arc::clone(&shared_clock)));
        let state = HttpState::new(users, limiter, shared_clock);

        Self {
            store,
            clock,
            state,
            _dir: dir,
        }
    }

    /// The application as the server assembles it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .wrap(security_headers(false))
            .configure(configure(CorsPolicy::from_list("http://localhost:*")))
    }
}
