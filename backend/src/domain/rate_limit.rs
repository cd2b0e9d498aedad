//! Request budget policy.
//!
//! A budget caps how many requests one client may make inside a fixed
//! window. Every rate-limited operation is subject to the global budgets and
//! to its own per-operation budget; a request is admitted only when all of
//! them have room.

use std::fmt;
use std::time::Duration;

/// Fixed window granularity. Windows are aligned to the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Minute,
    Hour,
    Day,
}

impl Window {
    /// Window length.
    pub const fn length(self) -> Duration {
        Duration::from_secs(self.seconds())
    }

    /// Window length in whole seconds.
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => 24 * 60 * 60,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        };
        f.write_str(label)
    }
}

/// Rate-limited operations.
///
/// `Health` and `Console` have no budget of their own and only count
/// against the global ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Health,
    Console,
    ListUsers,
    GetUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    Stats,
}

impl Operation {
    /// Stable label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Console => "console",
            Self::ListUsers => "list_users",
            Self::GetUser => "get_user",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a budget counts: all rate-limited traffic, or one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Operation(Operation),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Operation(operation) => operation.fmt(f),
        }
    }
}

/// `limit` requests per `window`, counted per client within `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Budget {
    pub scope: Scope,
    pub limit: u32,
    pub window: Window,
}

impl Budget {
    /// Global budget shared by every rate-limited operation.
    pub const fn global(limit: u32, window: Window) -> Self {
        Self {
            scope: Scope::Global,
            limit,
            window,
        }
    }

    /// Budget specific to one operation.
    pub const fn per_operation(operation: Operation, limit: u32, window: Window) -> Self {
        Self {
            scope: Scope::Operation(operation),
            limit,
            window,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.scope, self.limit, self.window)
    }
}

/// Identity a budget is counted against (the caller's address).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Key used when the peer address is unavailable.
    pub const UNKNOWN: &'static str = "unknown";

    /// Wrap a caller identity.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Shared key for callers without a known address.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }
}

impl AsRef<str> for ClientKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Budgets applied to each operation.
///
/// # Examples
/// ```
/// use userdesk::domain::rate_limit::{Operation, RateLimitPolicy};
///
/// let policy = RateLimitPolicy::default();
/// // 200/day, 50/hour and create's own 10/minute.
/// assert_eq!(policy.budgets_for(Operation::CreateUser).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    global: Vec<Budget>,
    operations: Vec<Budget>,
}

impl RateLimitPolicy {
    /// Build a policy from explicit budgets.
    ///
    /// Budgets in `operations` must use [`Scope::Operation`]; global ones are
    /// applied to every operation.
    pub fn new(global: Vec<Budget>, operations: Vec<Budget>) -> Self {
        Self { global, operations }
    }

    /// Every budget the operation must fit into.
    pub fn budgets_for(&self, operation: Operation) -> Vec<Budget> {
        self.global
            .iter()
            .chain(
                self.operations
                    .iter()
                    .filter(|budget| budget.scope == Scope::Operation(operation)),
            )
            .copied()
            .collect()
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(
            vec![
                Budget::global(200, Window::Day),
                Budget::global(50, Window::Hour),
            ],
            vec![
                Budget::per_operation(Operation::CreateUser, 10, Window::Minute),
                Budget::per_operation(Operation::UpdateUser, 20, Window::Minute),
                Budget::per_operation(Operation::DeleteUser, 10, Window::Minute),
                Budget::per_operation(Operation::ListUsers, 30, Window::Minute),
                Budget::per_operation(Operation::GetUser, 60, Window::Minute),
                Budget::per_operation(Operation::Stats, 30, Window::Minute),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operation::ListUsers, 30)]
    #[case(Operation::GetUser, 60)]
    #[case(Operation::CreateUser, 10)]
    #[case(Operation::UpdateUser, 20)]
    #[case(Operation::DeleteUser, 10)]
    #[case(Operation::Stats, 30)]
    fn default_policy_adds_operation_budget_to_globals(
        #[case] operation: Operation,
        #[case] per_minute: u32,
    ) {
        let budgets = RateLimitPolicy::default().budgets_for(operation);
        assert_eq!(
            budgets,
            vec![
                Budget::global(200, Window::Day),
                Budget::global(50, Window::Hour),
                Budget::per_operation(operation, per_minute, Window::Minute),
            ]
        );
    }

    #[rstest]
    #[case(Operation::Health)]
    #[case(Operation::Console)]
    fn unbudgeted_operations_only_get_globals(#[case] operation: Operation) {
        assert_eq!(
            RateLimitPolicy::default().budgets_for(operation),
            vec![
                Budget::global(200, Window::Day),
                Budget::global(50, Window::Hour),
            ]
        );
    }

    #[rstest]
    fn window_lengths() {
        assert_eq!(Window::Minute.length(), Duration::from_secs(60));
        assert_eq!(Window::Hour.seconds(), 3_600);
        assert_eq!(Window::Day.seconds(), 86_400);
    }

    #[rstest]
    fn budgets_render_for_logs() {
        let budget = Budget::per_operation(Operation::CreateUser, 10, Window::Minute);
        assert_eq!(budget.to_string(), "create_user 10/minute");
        assert_eq!(Budget::global(50, Window::Hour).to_string(), "global 50/hour");
    }
}
