//! User-facing notifications.

use std::fmt;

use askama::Template;

use crate::checkout::OrderConfirmation;
use crate::error::AppError;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Font Awesome icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Info => "info-circle",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn added_to_cart(name: &str) -> Self {
        Self::success(format!("{name} added to cart!"))
    }

    #[must_use]
    pub fn order_placed(confirmation: &OrderConfirmation) -> Self {
        Self::success(format!(
            "Order placed! Your order number is {}.",
            confirmation.order_number
        ))
    }

    /// When and how the order will be paid, shown under
    /// [`order_placed`](Self::order_placed).
    #[must_use]
    pub fn order_details(confirmation: &OrderConfirmation) -> Self {
        Self::info(format!(
            "Placed {}. Payment: {}.",
            placed_at(confirmation),
            confirmation.payment_method.label()
        ))
    }

    /// Report `err` and wrap its customer-facing message.
    #[must_use]
    pub fn from_error(err: &AppError) -> Self {
        err.report();
        Self::error(err.user_message())
    }

    /// Render as an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        NotificationTemplate {
            level: self.level.as_str(),
            icon: self.level.icon(),
            message: &self.message,
        }
        .render()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Error => write!(f, "error: {}", self.message),
            Level::Success | Level::Info => f.write_str(&self.message),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/notification.html")]
struct NotificationTemplate<'a> {
    level: &'a str,
    icon: &'a str,
    message: &'a str,
}

/// Success modal shown after an order is accepted.
#[derive(Template)]
#[template(path = "partials/order_confirmation.html")]
pub struct OrderConfirmationTemplate {
    pub order_number: String,
    pub total: String,
    pub payment: &'static str,
    pub placed_at: String,
}

impl From<&OrderConfirmation> for OrderConfirmationTemplate {
    fn from(confirmation: &OrderConfirmation) -> Self {
        Self {
            order_number: confirmation.order_number.clone(),
            total: confirmation.total.to_string(),
            payment: confirmation.payment_method.label(),
            placed_at: placed_at(confirmation),
        }
    }
}

fn placed_at(confirmation: &OrderConfirmation) -> String {
    confirmation.placed_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use movenpick_core::{Money, PaymentMethod, ValidationError};

    use super::*;

    fn confirmation() -> OrderConfirmation {
        OrderConfirmation {
            order_number: "MVP-0042".into(),
            total: Money::new(14_000),
            payment_method: PaymentMethod::MobileMoney,
            placed_at: chrono::Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_added_to_cart() {
        let n = Notification::added_to_cart("Burger");
        assert_eq!(n.level, Level::Success);
        assert_eq!(n.message, "Burger added to cart!");
        assert_eq!(n.to_string(), "Burger added to cart!");
    }

    #[test]
    fn test_from_error() {
        let n = Notification::from_error(&AppError::from(ValidationError::EmptyCart));
        assert_eq!(n.level, Level::Error);
        assert_eq!(n.to_string(), "error: Your cart is empty!");
    }

    #[test]
    fn test_render_escapes_message() {
        let html = Notification::error("<b>nope</b>").render().unwrap();
        assert!(html.contains("notification error"));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("exclamation-circle"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_order_confirmation() {
        let n = Notification::order_placed(&confirmation());
        assert!(n.message.contains("MVP-0042"));

        let html = OrderConfirmationTemplate::from(&confirmation()).render().unwrap();
        assert!(html.contains("MVP-0042"));
        assert!(html.contains("14,000 RWF"));
        assert!(html.contains("Mobile Money"));
        assert!(html.contains("2026-03-14 18:30 UTC"));
    }

    #[test]
    fn test_order_details() {
        let n = Notification::order_details(&confirmation());
        assert_eq!(n.level, Level::Info);
        assert_eq!(n.to_string(), "Placed 2026-03-14 18:30 UTC. Payment: Mobile Money.");
    }
}
