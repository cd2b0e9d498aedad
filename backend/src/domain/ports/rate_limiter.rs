//! Port for request admission against rate-limit budgets.
//!
//! Inbound adapters ask the limiter before doing any work. Implementations
//! decide where counters live; the in-process adapter keeps them in memory,
//! a shared backend could keep them elsewhere without touching handlers.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::rate_limit::{Budget, ClientKey};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The request fits every budget and has been counted.
    Allowed,
    /// At least one budget is exhausted; nothing was counted.
    Denied {
        /// The first exhausted budget.
        budget: Budget,
        /// Time until that budget's window rolls over.
        retry_after: Duration,
    },
}

impl Decision {
    /// Helper to check if the request was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Atomic try-consume over a set of budgets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `client` against every budget, or none of them.
    ///
    /// The check and the increment happen as a single step so concurrent
    /// callers cannot overshoot a limit.
    async fn try_acquire(&self, client: &ClientKey, budgets: &[Budget]) -> Decision;
}

/// Limiter that admits everything.
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedRateLimiter;

#[cfg(test)]
#[async_trait]
impl RateLimiter for UnlimitedRateLimiter {
    async fn try_acquire(&self, _client: &ClientKey, _budgets: &[Budget]) -> Decision {
        Decision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate_limit::{Operation, RateLimitPolicy};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn unlimited_limiter_always_admits() {
        let limiter = UnlimitedRateLimiter;
        let budgets = RateLimitPolicy::default().budgets_for(Operation::CreateUser);
        for _ in 0..1_000 {
            let decision = limiter.try_acquire(&ClientKey::unknown(), &budgets).await;
            assert!(decision.is_allowed());
        }
    }
}
