//! In-process fixed-window rate limiter.
//!
//! Counters are keyed by client, budget scope, window kind and window start.
//! Windows are aligned to the Unix epoch, so a minute budget resets on the
//! minute for every client. State is volatile and lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{Decision, RateLimiter};
use crate::domain::rate_limit::{Budget, ClientKey, Scope, Window};

/// Tracked counters above which expired windows are dropped.
const DEFAULT_SWEEP_THRESHOLD: usize = 10_000;
/// Minimum seconds between two sweeps.
const SWEEP_INTERVAL_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CounterKey {
    client: ClientKey,
    scope: Scope,
    window: Window,
    window_start: i64,
}

impl CounterKey {
    fn is_expired(&self, now: i64) -> bool {
        self.window_start + window_seconds(self.window) <= now
    }
}

fn window_seconds(window: Window) -> i64 {
    i64::try_from(window.seconds()).unwrap_or(i64::MAX)
}

fn window_start(now: i64, window: Window) -> i64 {
    now - now.rem_euclid(window_seconds(window))
}

struct Counters {
    windows: HashMap<CounterKey, u32>,
    next_sweep_at: i64,
}

impl Counters {
    /// Drop expired windows once the map is large, at most once per interval.
    fn sweep(&mut self, now: i64, threshold: usize) {
        if self.windows.len() <= threshold || now < self.next_sweep_at {
            return;
        }
        let before = self.windows.len();
        self.windows.retain(|key, _| !key.is_expired(now));
        self.next_sweep_at = now.saturating_add(SWEEP_INTERVAL_SECS);
        debug!(
            swept = before - self.windows.len(),
            remaining = self.windows.len(),
            "swept expired rate-limit windows"
        );
    }
}

/// Fixed-window limiter holding its counters in memory.
///
/// A single mutex guards all counters; each call checks every budget and
/// increments them only if all admit, inside one critical section.
pub struct InMemoryRateLimiter {
    clock: Arc<dyn Clock>,
    counters: Mutex<Counters>,
    sweep_threshold: usize,
}

impl InMemoryRateLimiter {
    /// Create a limiter reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            counters: Mutex::new(Counters {
                windows: HashMap::new(),
                next_sweep_at: i64::MIN,
            }),
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }

    /// Change how many counters may accumulate before expired ones are swept.
    #[must_use]
    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    /// Number of counters currently held.
    pub fn tracked_counters(&self) -> usize {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }

    fn acquire_at(&self, now: i64, client: &ClientKey, budgets: &[Budget]) -> Decision {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        counters.sweep(now, self.sweep_threshold);

        let keys: Vec<CounterKey> = budgets
            .iter()
            .map(|budget| CounterKey {
                client: client.clone(),
                scope: budget.scope,
                window: budget.window,
                window_start: window_start(now, budget.window),
            })
            .collect();

        for (budget, key) in budgets.iter().zip(&keys) {
            let used = counters.windows.get(key).copied().unwrap_or(0);
            if used >= budget.limit {
                let resets_at = key.window_start + window_seconds(budget.window);
                let wait = u64::try_from(resets_at - now).unwrap_or(0);
                return Decision::Denied {
                    budget: *budget,
                    retry_after: Duration::from_secs(wait),
                };
            }
        }

        for key in keys {
            let used = counters.windows.entry(key).or_insert(0);
            *used = used.saturating_add(1);
        }
        Decision::Allowed
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn try_acquire(&self, client: &ClientKey, budgets: &[Budget]) -> Decision {
        let now = self.clock.utc().timestamp();
        self.acquire_at(now, client, budgets)
    }
}

#[cfg(test)]
mod tests;
