//! Cross-origin resource sharing for the JSON API.
//!
//! Origins come from configuration as a comma-separated list. An entry
//! ending in `*` matches any origin starting with the text before it, so
//! `http://localhost:*` admits every local port. Requests whose origin is
//! the service's own host are always admitted, so the console page keeps
//! working whichever address it was opened on.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::RequestHead;
use actix_web::http::header::{self, HeaderValue};

const ALLOWED_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// One configured origin.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(String),
    Prefix(String),
}

impl OriginRule {
    fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) => Self::Prefix(prefix.to_owned()),
            None => Self::Exact(raw.to_owned()),
        }
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(expected) => origin == expected,
            Self::Prefix(prefix) => origin.starts_with(prefix.as_str()),
        }
    }
}

/// Origins allowed to call the API from a browser.
///
/// # Examples
/// ```
/// use userdesk::middleware::cors::CorsPolicy;
///
/// let policy = CorsPolicy::from_list("http://localhost:*, https://app.example.com");
/// assert!(policy.allows("http://localhost:3000"));
/// assert!(policy.allows("https://app.example.com"));
/// assert!(!policy.allows("https://evil.example.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    rules: Vec<OriginRule>,
}

impl CorsPolicy {
    /// Parse a comma-separated origin list; blank entries are ignored.
    pub fn from_list(list: &str) -> Self {
        Self {
            rules: list
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(OriginRule::parse)
                .collect(),
        }
    }

    /// Whether a request from `origin` may read the response.
    pub fn allows(&self, origin: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(origin))
    }

    /// True when no origin is allowed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn admits(&self, origin: &HeaderValue, head: &RequestHead) -> bool {
        origin
            .to_str()
            .is_ok_and(|origin| self.allows(origin) || is_same_origin(origin, head))
    }
}

/// `origin` names the host the request was sent to.
fn is_same_origin(origin: &str, head: &RequestHead) -> bool {
    let Some(host) = head
        .headers()
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
    else {
        return false;
    };
    ["http://", "https://"]
        .iter()
        .filter_map(|scheme| origin.strip_prefix(scheme))
        .any(|authority| authority.eq_ignore_ascii_case(host))
}

/// CORS middleware for the `/api` scope.
///
/// Disallowed origins are refused by the middleware before reaching a
/// handler; preflights are answered without routing.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use userdesk::middleware::cors::{CorsPolicy, api_cors};
///
/// let app = App::new().service(
///     web::scope("/api").wrap(api_cors(CorsPolicy::from_list("http://localhost:*"))),
/// );
/// ```
pub fn api_cors(policy: CorsPolicy) -> Cors {
    let policy = Arc::new(policy);
    Cors::default()
        .allowed_origin_fn(move |origin, head| policy.admits(origin, head))
        .allowed_methods(ALLOWED_METHODS)
        .allowed_header(header::CONTENT_TYPE)
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}
