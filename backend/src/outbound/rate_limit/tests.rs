//! Tests for the in-memory rate limiter.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::rate_limit::{Operation, RateLimitPolicy};

/// Clock that only moves when told to.
struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Ten seconds into a minute, hour and day window.
fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 10)
        .single()
        .expect("valid start time")
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(start_time()))
}

fn limiter(clock: &Arc<MutableClock>) -> InMemoryRateLimiter {
    let clock: Arc<dyn Clock> = clock.clone();
    InMemoryRateLimiter::new(clock)
}

fn per_minute(limit: u32) -> Vec<Budget> {
    vec![Budget::per_operation(Operation::CreateUser, limit, Window::Minute)]
}

#[rstest]
#[tokio::test]
async fn admits_up_to_the_limit_then_denies(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock);
    let client = ClientKey::new("10.0.0.1");
    let budgets = per_minute(3);

    for _ in 0..3 {
        assert!(limiter.try_acquire(&client, &budgets).await.is_allowed());
    }
    let decision = limiter.try_acquire(&client, &budgets).await;
    assert_eq!(
        decision,
        Decision::Denied {
            budget: budgets[0],
            retry_after: Duration::from_secs(50),
        }
    );
}

#[rstest]
#[tokio::test]
async fn window_rollover_restores_the_budget(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock);
    let client = ClientKey::new("10.0.0.1");
    let budgets = per_minute(1);

    assert!(limiter.try_acquire(&client, &budgets).await.is_allowed());
    assert!(!limiter.try_acquire(&client, &budgets).await.is_allowed());

    clock.advance_seconds(49);
    assert!(!limiter.try_acquire(&client, &budgets).await.is_allowed());

    clock.advance_seconds(1);
    assert!(limiter.try_acquire(&client, &budgets).await.is_allowed());
}

#[rstest]
#[tokio::test]
async fn clients_are_counted_separately(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock);
    let budgets = per_minute(1);

    assert!(
        limiter
            .try_acquire(&ClientKey::new("10.0.0.1"), &budgets)
            .await
            .is_allowed()
    );
    assert!(
        limiter
            .try_acquire(&ClientKey::new("10.0.0.2"), &budgets)
            .await
            .is_allowed()
    );
    assert!(
        !limiter
            .try_acquire(&ClientKey::new("10.0.0.1"), &budgets)
            .await
            .is_allowed()
    );
}

#[rstest]
#[tokio::test]
async fn denial_consumes_nothing_from_other_budgets(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock);
    let client = ClientKey::new("10.0.0.1");
    let hourly = Budget::global(5, Window::Hour);
    let tight = vec![hourly, Budget::per_operation(Operation::DeleteUser, 1, Window::Minute)];
    let loose = vec![hourly, Budget::per_operation(Operation::ListUsers, 10, Window::Minute)];

    assert!(limiter.try_acquire(&client, &tight).await.is_allowed());
    for _ in 0..3 {
        assert!(!limiter.try_acquire(&client, &tight).await.is_allowed());
    }

    // One hourly slot used so far; four remain for other operations.
    for _ in 0..4 {
        assert!(limiter.try_acquire(&client, &loose).await.is_allowed());
    }
    let decision = limiter.try_acquire(&client, &loose).await;
    assert!(matches!(
        decision,
        Decision::Denied { budget, .. } if budget == hourly
    ));
}

#[rstest]
#[tokio::test]
async fn global_budget_is_shared_across_operations(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock);
    let client = ClientKey::new("10.0.0.1");
    let policy = RateLimitPolicy::new(
        vec![Budget::global(2, Window::Day)],
        vec![
            Budget::per_operation(Operation::GetUser, 60, Window::Minute),
            Budget::per_operation(Operation::Stats, 30, Window::Minute),
        ],
    );

    let get = policy.budgets_for(Operation::GetUser);
    let stats = policy.budgets_for(Operation::Stats);
    assert!(limiter.try_acquire(&client, &get).await.is_allowed());
    assert!(limiter.try_acquire(&client, &stats).await.is_allowed());

    match limiter.try_acquire(&client, &get).await {
        Decision::Denied {
            budget,
            retry_after,
        } => {
            assert_eq!(budget, Budget::global(2, Window::Day));
            assert_eq!(retry_after, Duration::from_secs(86_400 - 10));
        }
        Decision::Allowed => panic!("daily budget should be exhausted"),
    }
}

#[rstest]
#[tokio::test]
async fn concurrent_callers_never_overshoot(clock: Arc<MutableClock>) {
    let limiter = Arc::new(limiter(&clock));
    let budgets = Arc::new(per_minute(25));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let budgets = Arc::clone(&budgets);
            tokio::spawn(async move {
                limiter
                    .try_acquire(&ClientKey::unknown(), &budgets)
                    .await
                    .is_allowed()
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if handle.await.expect("task completes") {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 25);
}

#[rstest]
#[tokio::test]
async fn expired_windows_are_swept_past_the_threshold(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock).with_sweep_threshold(2);
    let budgets = per_minute(10);

    for client in ["a", "b", "c"] {
        assert!(
            limiter
                .try_acquire(&ClientKey::new(client), &budgets)
                .await
                .is_allowed()
        );
    }
    assert_eq!(limiter.tracked_counters(), 3);

    clock.advance_seconds(60);
    assert!(
        limiter
            .try_acquire(&ClientKey::new("d"), &budgets)
            .await
            .is_allowed()
    );
    assert_eq!(limiter.tracked_counters(), 1);
}

async fn acquire(limiter: &InMemoryRateLimiter, client: &str, budgets: &[Budget]) {
    let decision = limiter.try_acquire(&ClientKey::new(client), budgets).await;
    assert!(decision.is_allowed(), "{client} denied");
}

#[rstest]
#[tokio::test]
async fn sweeps_run_at_most_once_a_minute(clock: Arc<MutableClock>) {
    let limiter = limiter(&clock).with_sweep_threshold(1);
    let budgets = per_minute(10);

    acquire(&limiter, "a", &budgets).await;
    acquire(&limiter, "b", &budgets).await;
    clock.advance_seconds(60);
    acquire(&limiter, "c", &budgets).await;
    assert_eq!(limiter.tracked_counters(), 1);

    acquire(&limiter, "d", &budgets).await;
    clock.advance_seconds(55);
    // "c" and "d" have expired, but the last sweep was under a minute ago.
    acquire(&limiter, "e", &budgets).await;
    assert_eq!(limiter.tracked_counters(), 3);

    clock.advance_seconds(5);
    acquire(&limiter, "f", &budgets).await;
    assert_eq!(limiter.tracked_counters(), 2);
}
