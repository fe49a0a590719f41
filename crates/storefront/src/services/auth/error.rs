//! Authentication error types.

use movenpick_core::{EmailError, PhoneError};
use thiserror::Error;

use crate::storage::StorageError;

/// Which auth form an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
}

impl AuthAction {
    /// Message used when the endpoint rejects a request without saying why.
    #[must_use]
    pub const fn default_error(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Signup => "Signup failed",
        }
    }

    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Login => "Login successful!",
            Self::Signup => "Account created successfully!",
        }
    }
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signup password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The email field failed validation. Checked before any request.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The signup phone field failed validation.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Another login or signup is still waiting for the endpoint.
    #[error("an auth request is already in flight")]
    InFlight,

    /// The endpoint could not be reached.
    #[error("{action:?} request failed: {source}")]
    Http {
        action: AuthAction,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The endpoint answered with something we cannot read.
    #[error("malformed {action:?} response: {message}")]
    Malformed { action: AuthAction, message: String },

    /// The cached user could not be erased.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PasswordMismatch => "Passwords do not match!".to_string(),
            Self::InvalidEmail(_) => "Please enter a valid email".to_string(),
            Self::InvalidPhone(_) => "Please enter a valid phone number".to_string(),
            Self::InFlight => "Please wait for the current request to finish.".to_string(),
            Self::Rejected(msg) => msg.clone(),
            Self::Http { action, .. } | Self::Malformed { action, .. } => {
                format!("{}. Please try again.", action.default_error())
            }
            Self::Storage(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
