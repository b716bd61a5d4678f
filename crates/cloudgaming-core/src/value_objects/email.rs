//! Email address value object
//!
//! Accounts are keyed by email, so every address is normalized (trimmed and
//! lowercased) before it is compared or stored.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::DomainError;

/// Normalized email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an address (RFC 5321 path limit)
    pub const MAX_LEN: usize = 254;

    /// Normalize and validate a raw address
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEmail` if the address is empty, too long,
    /// or not a syntactically valid email.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() || normalized.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidEmail);
        }

        if !normalized.validate_email() {
            return Err(DomainError::InvalidEmail);
        }

        Ok(Self(normalized))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_differently_cased_addresses_are_equal() {
        assert_eq!(
            Email::parse("alice@example.com").unwrap(),
            Email::parse("ALICE@example.com").unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_addresses() {
        assert!(matches!(Email::parse(""), Err(DomainError::InvalidEmail)));
        assert!(matches!(Email::parse("   "), Err(DomainError::InvalidEmail)));
        assert!(matches!(Email::parse("not-an-email"), Err(DomainError::InvalidEmail)));
        assert!(matches!(Email::parse("@example.com"), Err(DomainError::InvalidEmail)));
    }

    #[test]
    fn test_rejects_overlong_address() {
        let local = "a".repeat(64);
        let domain = format!("{}.com", "b".repeat(200));
        let raw = format!("{local}@{domain}");
        assert!(raw.len() > Email::MAX_LEN);
        assert!(Email::parse(&raw).is_err());
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let email = Email::parse("bob@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"bob@example.com\"");

        let back: Email = serde_json::from_str("\"BOB@example.com\"").unwrap();
        assert_eq!(back, email);
    }
}
