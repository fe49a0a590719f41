//! Payment methods offered at checkout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a payment method string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid payment method: {0}")]
pub struct PaymentMethodError(pub String);

/// How the customer pays on delivery.
///
/// Serialised with the values the checkout radio buttons submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileMoney,
}

impl PaymentMethod {
    /// All methods in display order.
    pub const ALL: [Self; 3] = [Self::Cash, Self::Card, Self::MobileMoney];

    /// Wire value sent to the order endpoint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::MobileMoney => "MobileMoney",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash on delivery",
            Self::Card => "Card",
            Self::MobileMoney => "Mobile Money",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "mobilemoney" | "momo" => Ok(Self::MobileMoney),
            _ => Err(PaymentMethodError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "mobile_money".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileMoney
        );
        assert_eq!(
            "Mobile Money".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileMoney
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(PaymentMethodError("cheque".to_owned()))
        );
    }

    #[test]
    fn test_wire_value_roundtrips_through_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "Cash on delivery");
        assert_eq!(PaymentMethod::MobileMoney.label(), "Mobile Money");
    }
}
