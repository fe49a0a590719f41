//! Delivery details captured at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::payment::{PaymentMethod, PaymentMethodError};

/// A required delivery form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryField {
    FullName,
    Phone,
    Address,
}

impl DeliveryField {
    /// Label shown next to the field.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Phone => "Phone number",
            Self::Address => "Delivery address",
        }
    }
}

impl fmt::Display for DeliveryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a checkout is rejected before anything is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing to order.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// A required field is blank after trimming.
    #[error("{0} is required")]
    MissingField(DeliveryField),

    /// No payment method was selected.
    #[error("Please select a payment method")]
    MissingPaymentMethod,

    /// The selected payment method is not one we accept.
    #[error("{0}")]
    InvalidPaymentMethod(#[from] PaymentMethodError),
}

impl ValidationError {
    /// The form field the error belongs to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<DeliveryField> {
        match self {
            Self::MissingField(field) => Some(*field),
            _ => None,
        }
    }
}

/// Raw, unvalidated checkout form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub payment_method: Option<String>,
}

/// Validated delivery details for a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    full_name: String,
    phone: String,
    address: String,
    city: String,
    payment_method: PaymentMethod,
}

impl DeliveryDetails {
    /// Validate a checkout form.
    ///
    /// Fields are trimmed. Name, phone and address must be non-empty; city
    /// is optional. Checks run in form order and the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    ///
    /// ```
    /// use movenpick_core::{CheckoutForm, DeliveryDetails, DeliveryField, ValidationError};
    ///
    /// let form = CheckoutForm {
    ///     full_name: "   ".into(),
    ///     phone: "0788000000".into(),
    ///     address: "KN 5 Rd".into(),
    ///     city: "Kigali".into(),
    ///     payment_method: Some("Cash".into()),
    /// };
    /// assert_eq!(
    ///     DeliveryDetails::parse(&form),
    ///     Err(ValidationError::MissingField(DeliveryField::FullName))
    /// );
    /// ```
    pub fn parse(form: &CheckoutForm) -> Result<Self, ValidationError> {
        let full_name = required(&form.full_name, DeliveryField::FullName)?;
        let phone = required(&form.phone, DeliveryField::Phone)?;
        let address = required(&form.address, DeliveryField::Address)?;

        let payment_method = form
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingPaymentMethod)?
            .parse::<PaymentMethod>()?;

        Ok(Self {
            full_name,
            phone,
            address,
            city: form.city.trim().to_owned(),
            payment_method,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

fn required(value: &str, field: DeliveryField) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            full_name: " Aline Uwase ".into(),
            phone: "0788123456".into(),
            address: "KG 7 Ave".into(),
            city: " Kigali ".into(),
            payment_method: Some("MobileMoney".into()),
        }
    }

    #[test]
    fn test_parse_trims_fields() {
        let details = DeliveryDetails::parse(&valid_form()).unwrap();
        assert_eq!(details.full_name(), "Aline Uwase");
        assert_eq!(details.city(), "Kigali");
        assert_eq!(details.payment_method(), PaymentMethod::MobileMoney);
    }

    #[test]
    fn test_missing_fields_in_form_order() {
        let mut form = valid_form();
        form.phone = String::new();
        form.address = "  ".into();
        assert_eq!(
            DeliveryDetails::parse(&form),
            Err(ValidationError::MissingField(DeliveryField::Phone))
        );

        form.phone = "0788".into();
        let err = DeliveryDetails::parse(&form).unwrap_err();
        assert_eq!(err.field(), Some(DeliveryField::Address));
        assert_eq!(err.to_string(), "Delivery address is required");
    }

    #[test]
    fn test_city_is_optional() {
        let mut form = valid_form();
        form.city = String::new();
        assert!(DeliveryDetails::parse(&form).is_ok());
    }

    #[test]
    fn test_payment_method_required() {
        let mut form = valid_form();
        form.payment_method = None;
        assert_eq!(
            DeliveryDetails::parse(&form),
            Err(ValidationError::MissingPaymentMethod)
        );

        form.payment_method = Some(" ".into());
        assert_eq!(
            DeliveryDetails::parse(&form),
            Err(ValidationError::MissingPaymentMethod)
        );
    }

    #[test]
    fn test_payment_method_must_be_known() {
        let mut form = valid_form();
        form.payment_method = Some("Bitcoin".into());
        assert!(matches!(
            DeliveryDetails::parse(&form),
            Err(ValidationError::InvalidPaymentMethod(_))
        ));
    }
}
