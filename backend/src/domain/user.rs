//! User data model.
//!
//! Client input only becomes a field newtype through sanitising and
//! validation, so a [`NewUser`] or [`UserChanges`] can never carry a
//! malformed name or email. Rows read back from the store are taken as
//! they are.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::validation::{
    EMAIL_MAX_LENGTH, NAME_MAX_LENGTH, sanitize, validate_email, validate_name,
};

/// Validation errors returned by the field constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers must be strictly positive.
    #[error("user id must be a positive integer")]
    InvalidId,
    /// Name failed the character or length rules.
    #[error("name must be 2-100 letters, digits, spaces, hyphens, apostrophes or periods")]
    InvalidName,
    /// Email does not look like `local@domain.tld`.
    #[error("email must look like local@domain.tld")]
    InvalidEmail,
}

/// Store-assigned user identifier. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use userdesk::domain::UserId;
    ///
    /// assert!(UserId::new(1).is_ok());
    /// assert!(UserId::new(0).is_err());
    /// assert!(UserId::new(-4).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw < 1 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Identifier read from the store, taken as is.
    pub(crate) fn from_stored(raw: i64) -> Self {
        Self(raw)
    }

    /// Underlying integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sanitised, validated user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Sanitise untrusted input and validate the result.
    ///
    /// # Examples
    /// ```
    /// use userdesk::domain::UserName;
    ///
    /// let name = UserName::parse("  Ada Lovelace \u{7}").expect("valid name");
    /// assert_eq!(name.as_ref(), "Ada Lovelace");
    /// assert!(UserName::parse("x").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let cleaned = sanitize(raw, NAME_MAX_LENGTH);
        if !validate_name(&cleaned) {
            return Err(UserValidationError::InvalidName);
        }
        Ok(Self(cleaned))
    }

    /// Name read from the store, taken as is.
    pub(crate) fn from_stored(stored: String) -> Self {
        Self(stored)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Sanitised, validated email address. Compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Sanitise untrusted input and validate the result.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let cleaned = sanitize(raw, EMAIL_MAX_LENGTH);
        if !validate_email(&cleaned) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(cleaned))
    }

    /// Email read from the store, taken as is.
    pub(crate) fn from_stored(stored: String) -> Self {
        Self(stored)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Stored user record.
///
/// ## Invariants
/// - `id` is unique and never reused.
/// - `created_at` is set once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, name: UserName, email: EmailAddress, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
}

impl NewUser {
    /// Sanitise and validate both fields; the name is checked first.
    pub fn parse(name: &str, email: &str) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::parse(name)?,
            email: EmailAddress::parse(email)?,
        })
    }
}

/// Validated partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
}

impl UserChanges {
    /// True when no column would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(1, true)]
    #[case(99_999, true)]
    #[case(0, false)]
    #[case(-1, false)]
    fn user_ids_must_be_positive(#[case] raw: i64, #[case] ok: bool) {
        assert_eq!(UserId::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn new_user_reports_name_before_email() {
        let err = NewUser::parse("!", "nope").expect_err("both fields invalid");
        assert_eq!(err, UserValidationError::InvalidName);
    }

    #[rstest]
    fn new_user_keeps_sanitised_values() {
        let user = NewUser::parse("  Bob Martin ", " bob@example.com\u{0} ").expect("valid input");
        assert_eq!(user.name.as_ref(), "Bob Martin");
        assert_eq!(user.email.as_ref(), "bob@example.com");
    }

    #[rstest]
    fn changes_report_emptiness() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            name: Some(UserName::parse("New Name").expect("valid name")),
            email: None,
        };
        assert!(!changes.is_empty());
    }

    #[rstest]
    fn user_serialises_with_snake_case_fields() {
        let created_at = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        let user = User::new(
            UserId::new(7).expect("valid id"),
            UserName::parse("Alice Dupont").expect("valid name"),
            EmailAddress::parse("alice@example.com").expect("valid email"),
            created_at,
        );

        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Alice Dupont",
                "email": "alice@example.com",
                "created_at": "2026-01-02T03:04:05Z",
            })
        );
    }
}
