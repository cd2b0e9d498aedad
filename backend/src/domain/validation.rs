//! Input sanitisation and format checks for untrusted user fields.
//!
//! All functions are pure. Sanitisation runs first and only normalises;
//! validation then rejects anything still malformed.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum characters kept from a raw name before validation.
pub const NAME_MAX_LENGTH: usize = 100;
/// Maximum characters kept from a raw email before validation.
pub const EMAIL_MAX_LENGTH: usize = 200;

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9\s'.-]{2,100}$")
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Strip control characters, truncate, and trim surrounding whitespace.
///
/// Tab, newline and carriage return survive the control-character pass.
/// Truncation counts characters, not bytes.
///
/// # Examples
/// ```
/// use userdesk::domain::validation::sanitize;
///
/// assert_eq!(sanitize("  Ada\u{0}Lovelace  ", 100), "AdaLovelace");
/// assert_eq!(sanitize("abcdef", 3), "abc");
/// assert_eq!(sanitize("", 10), "");
/// ```
pub fn sanitize(text: &str, max_length: usize) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .take(max_length)
        .collect();
    kept.trim().to_owned()
}

/// Check a display name: 2 to 100 characters once trimmed, restricted to
/// letters, digits, whitespace, `-`, `'` and `.`.
///
/// # Examples
/// ```
/// use userdesk::domain::validation::validate_name;
///
/// assert!(validate_name("Alice Dupont"));
/// assert!(!validate_name("A"));
/// assert!(!validate_name("Test123!@#"));
/// ```
pub fn validate_name(text: &str) -> bool {
    name_regex().is_match(text.trim())
}

/// Check an email address against the `local@domain.tld` shape.
///
/// # Examples
/// ```
/// use userdesk::domain::validation::validate_email;
///
/// assert!(validate_email("alice@example.com"));
/// assert!(!validate_email("invalid-email"));
/// ```
pub fn validate_email(text: &str) -> bool {
    email_regex().is_match(text)
}
