//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the domain service and ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::RateLimiter;
use crate::domain::rate_limit::RateLimitPolicy;
use crate::domain::{StatsOptions, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub limiter: Arc<dyn RateLimiter>,
    pub policy: Arc<RateLimitPolicy>,
    pub stats: StatsOptions,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state with the default rate-limit policy and production
    /// stats options.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use userdesk::domain::UserService;
    /// use userdesk::inbound::http::state::HttpState;
    /// use userdesk::outbound::persistence::{DieselUserRepository, SqliteStore, StoreConfig};
    /// use userdesk::outbound::rate_limit::InMemoryRateLimiter;
    ///
    /// let store = SqliteStore::new(StoreConfig::new("users.db"));
    /// let users = UserService::new(
    ///     Arc::new(DieselUserRepository::new(store)),
    ///     Arc::new(DefaultClock),
    /// );
    /// let limiter = InMemoryRateLimiter::new(Arc::new(DefaultClock));
    /// let state = HttpState::new(users, Arc::new(limiter), Arc::new(DefaultClock));
    /// assert!(!state.stats.dev_mode);
    /// ```
    pub fn new(users: UserService, limiter: Arc<dyn RateLimiter>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            limiter,
            policy: Arc::new(RateLimitPolicy::default()),
            stats: StatsOptions::default(),
            clock,
        }
    }

    /// Replace the rate-limit policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Replace the stats options.
    #[must_use]
    pub fn with_stats_options(mut self, stats: StatsOptions) -> Self {
        self.stats = stats;
        self
    }
}
