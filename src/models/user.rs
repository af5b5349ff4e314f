//! User model
//!
//! A person who can take part in shared expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Display name used when a participant cannot be resolved to a user
pub const UNKNOWN_USER_NAME: &str = "Unknown";

/// A ledger user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Contact email, unique across users
    pub email: String,

    /// Ten-digit mobile number
    pub mobile: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        mobile: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            mobile: mobile.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Validate the user's contact fields
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if !is_plausible_email(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }

        if self.mobile.len() != 10 || !self.mobile.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserValidationError::InvalidMobile(self.mobile.clone()));
        }

        Ok(())
    }

    /// Normalize an email for uniqueness checks
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Check if this user matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Something shaped like `local@domain.tld` with no whitespace
///
/// Any `@` with text before it works, as long as a `.` after it has at least
/// one character on each side.
fn is_plausible_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    email.match_indices('@').any(|(at, _)| {
        let domain = &email[at + 1..];
        at > 0
            && domain
                .match_indices('.')
                .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    })
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    InvalidEmail(String),
    InvalidMobile(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Invalid name provided"),
            Self::InvalidEmail(email) => write!(f, "Invalid email format: '{}'", email),
            Self::InvalidMobile(mobile) => {
                write!(f, "Mobile number must be 10 digits, got '{}'", mobile)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_trims_fields() {
        let user = User::new("  Asha ", " asha@example.com", "9876543210 ");
        assert_eq!(user.name, "Asha");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.mobile, "9876543210");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let user = User::new("   ", "a@b.co", "9876543210");
        assert_eq!(user.validate(), Err(UserValidationError::EmptyName));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("a@b.co"));
        assert!(is_plausible_email("first.last@mail.example.org"));
        assert!(!is_plausible_email("no-at-sign.com"));
        assert!(!is_plausible_email("a@nodot"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a b@c.de"));
        assert!(is_plausible_email("a@b.c."));
        assert!(!is_plausible_email("a@b."));
        assert!(!is_plausible_email("a@.b"));
    }

    #[test]
    fn test_mobile_must_be_ten_digits() {
        let short = User::new("Ravi", "ravi@example.com", "12345");
        assert!(matches!(
            short.validate(),
            Err(UserValidationError::InvalidMobile(_))
        ));

        let letters = User::new("Ravi", "ravi@example.com", "12345abcde");
        assert!(matches!(
            letters.validate(),
            Err(UserValidationError::InvalidMobile(_))
        ));
    }

    #[test]
    fn test_matches_name() {
        let user = User::new("Meera", "meera@example.com", "9000000000");
        assert!(user.matches_name("meera"));
        assert!(!user.matches_name("mira"));
    }
}
