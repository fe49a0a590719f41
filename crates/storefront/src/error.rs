//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that front ends show to the customer
//! through [`AppError::user_message`]. Failures on our side are captured to
//! Sentry by [`AppError::report`] before being shown.

use movenpick_core::{CartError, ValidationError};
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::menu::MenuError;
use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Application-level error type for the ordering client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout form failed a precondition.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Order submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Login, signup or logout failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Menu could not be loaded or queried.
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is our fault rather than the customer's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Internal(_)
                | Self::Render(_)
                | Self::Config(_)
                | Self::Checkout(CheckoutError::Network(_) | CheckoutError::Encode(_))
                | Self::Auth(AuthError::Http { .. } | AuthError::Storage(_))
        )
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Internal error"
            );
        } else {
            tracing::debug!(error = %self, "User-facing error");
        }
    }

    /// Message to show the customer.
    ///
    /// Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(CartError::OutOfRange { index, .. }) => {
                format!("There is no item {} in your cart", index + 1)
            }
            Self::Cart(CartError::EmptyName) => "Item name is required".to_string(),
            Self::Cart(_) => "That item is no longer in your cart".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Checkout(err) => err.user_message(),
            Self::Auth(err) => err.user_message(),
            Self::Storage(_) | Self::Internal(_) | Self::Render(_) | Self::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Menu(MenuError::Io { .. } | MenuError::Parse(_)) => {
                "The menu is unavailable right now".to_string()
            }
            Self::Menu(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("name", "Burger")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use movenpick_core::{DeliveryField, LineItemId};

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Internal("session closed".to_string());
        assert_eq!(err.to_string(), "Internal error: session closed");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AppError::from(ValidationError::MissingField(DeliveryField::Phone)).user_message(),
            "Phone number is required"
        );
        assert_eq!(
            AppError::from(CartError::OutOfRange { index: 4, len: 2 }).user_message(),
            "There is no item 5 in your cart"
        );
        assert_eq!(
            AppError::from(CartError::UnknownItem(LineItemId::generate())).user_message(),
            "That item is no longer in your cart"
        );
        assert_eq!(
            AppError::from(CheckoutError::Endpoint("Kitchen closed".into())).user_message(),
            "Error: Kitchen closed"
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::from(StorageError::InvalidKey("../etc".into()));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("etc"));

        let err = AppError::from(CheckoutError::InFlight);
        assert!(!err.is_internal());
    }
}
