//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number cannot be empty")]
    Empty,
    /// A character other than digits, spaces, `-`, `+`, `(` or `)`.
    #[error("phone number cannot contain {0:?}")]
    InvalidChar(char),
    #[error("phone number must be at least {min} characters")]
    TooShort { min: usize },
}

/// A phone number as typed into a form, e.g. `+250 788 123 456`.
///
/// Only the character set and length are checked; formatting is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Shortest accepted input, counting separators.
    pub const MIN_LENGTH: usize = 10;

    /// Parse a `Phone` from form input.
    ///
    /// # Errors
    ///
    /// Returns an error for blank input, a disallowed character, or fewer
    /// than [`Self::MIN_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')')))
        {
            return Err(PhoneError::InvalidChar(c));
        }
        if s.chars().count() < Self::MIN_LENGTH {
            return Err(PhoneError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_local_and_international() {
        assert!(Phone::parse("0788123456").is_ok());
        assert!(Phone::parse("+250 (788) 123-456").is_ok());
    }

    #[test]
    fn test_rejections() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("12"), Err(PhoneError::TooShort { min: 10 }));
        assert_eq!(Phone::parse("0788-CALL-ME"), Err(PhoneError::InvalidChar('C')));
    }
}
