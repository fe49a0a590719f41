//! Order submission.
//!
//! [`OrderSubmitter::submit`] validates the delivery form, packages the cart
//! into an [`Order`], and hands it to an [`OrderEndpoint`] exactly once per
//! call. While the request is in flight the submitter's [`BusyFlag`] is set;
//! a second call fails fast with [`CheckoutError::InFlight`].
//!
//! On success the cart is cleared. On any failure the cart is left as it
//! was so the customer can retry by hand; nothing is retried automatically.

pub mod endpoint;

use chrono::{DateTime, Utc};
use movenpick_core::{
    Cart, CheckoutForm, DeliveryDetails, LineItem, Money, PaymentMethod, ValidationError,
};
use thiserror::Error;
use tracing::instrument;

use crate::busy::BusyFlag;
use crate::cart::CartStore;
use crate::error::add_breadcrumb;

pub use endpoint::{EndpointError, HttpOrderEndpoint, OrderEndpoint, OrderRequest, OrderResponse};

/// Message used when the endpoint rejects an order without saying why.
pub const DEFAULT_ENDPOINT_ERROR: &str = "Failed to place order";

/// Errors from a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The form or cart failed a precondition; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another submission is still waiting for the endpoint.
    #[error("an order is already being placed")]
    InFlight,

    /// The endpoint could not be reached.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The endpoint answered with `success: false`.
    #[error("order rejected: {0}")]
    Endpoint(String),

    /// The endpoint answered with something we cannot read.
    #[error("malformed order response: {0}")]
    MalformedResponse(String),

    /// The order could not be encoded.
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CheckoutError {
    /// Message to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::InFlight => "Your order is already being placed.".to_owned(),
            Self::Endpoint(msg) => format!("Error: {msg}"),
            Self::Network(_) | Self::MalformedResponse(_) | Self::Encode(_) => {
                "Failed to place order. Please try again.".to_owned()
            }
        }
    }
}

impl From<EndpointError> for CheckoutError {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::Http(e) => Self::Network(e),
            EndpointError::Status(code) => Self::MalformedResponse(format!("HTTP {code}")),
            EndpointError::Malformed(msg) => Self::MalformedResponse(msg),
        }
    }
}

/// A cart snapshot plus everything needed to deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    items: Vec<LineItem>,
    delivery_fee: Money,
    total: Money,
    details: DeliveryDetails,
}

impl Order {
    /// Snapshot `cart` into an order.
    #[must_use]
    pub fn new(cart: &Cart, delivery_fee: Money, details: DeliveryDetails) -> Self {
        Self {
            items: cart.items().to_vec(),
            delivery_fee,
            total: cart.totals(delivery_fee).total,
            details,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub const fn details(&self) -> &DeliveryDetails {
        &self.details
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.details.payment_method()
    }
}

/// Acknowledged order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

/// Submits orders to an endpoint, one at a time.
pub struct OrderSubmitter<E> {
    endpoint: E,
    busy: BusyFlag,
}

impl<E: OrderEndpoint> OrderSubmitter<E> {
    #[must_use]
    pub fn new(endpoint: E) -> Self {
        Self {
            endpoint,
            busy: BusyFlag::new(),
        }
    }

    /// The flag a view uses to disable its checkout button.
    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    #[must_use]
    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Validate `form`, submit the cart, and clear it on success.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] if the cart is empty or the form is
    ///   incomplete (no request is made)
    /// - [`CheckoutError::InFlight`] if another submission is pending
    /// - [`CheckoutError::Network`], [`CheckoutError::Endpoint`] or
    ///   [`CheckoutError::MalformedResponse`] if the endpoint call fails
    #[instrument(skip_all, fields(items = store.cart().len()))]
    pub async fn submit(
        &self,
        store: &mut CartStore,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if store.cart().is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let details = DeliveryDetails::parse(form)?;

        let Some(_busy) = self.busy.try_acquire() else {
            tracing::warn!("Checkout clicked while an order is in flight");
            return Err(CheckoutError::InFlight);
        };

        let order = Order::new(store.cart(), store.delivery_fee(), details);
        let request = OrderRequest::from_order(&order)?;
        let total = order.total().to_string();
        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[
                ("total", total.as_str()),
                ("payment_method", order.payment_method().as_str()),
            ]),
        );

        let response = self.endpoint.place_order(&request).await?;

        if !response.success {
            let message = response
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENDPOINT_ERROR.to_owned());
            tracing::warn!(error = %message, "Order rejected by endpoint");
            return Err(CheckoutError::Endpoint(message));
        }

        let Some(order_number) = response.order_number else {
            tracing::error!("Order endpoint reported success without an order number");
            return Err(CheckoutError::MalformedResponse(
                "missing orderNumber".to_owned(),
            ));
        };

        store.clear();
        tracing::info!(%order_number, total = %order.total(), "Order placed");

        Ok(OrderConfirmation {
            order_number,
            total: order.total(),
            payment_method: order.payment_method(),
            placed_at: Utc::now(),
        })
    }
}
