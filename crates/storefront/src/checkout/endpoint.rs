//! Order-processing endpoint client.
//!
//! The endpoint takes a form-encoded order and answers with
//! `{success, orderNumber?, error?}`. [`OrderEndpoint`] is the seam the
//! submitter talks to; [`HttpOrderEndpoint`] is the reqwest implementation.

use std::future::Future;

use movenpick_core::{Money, PaymentMethod};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use super::Order;

/// Path of the order endpoint relative to the site base URL.
pub const ORDER_PATH: &str = "orders/place_order.php";

/// Errors talking to the order endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The request never got a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without a readable body.
    #[error("order endpoint returned HTTP {0}")]
    Status(u16),

    /// The response body is not the expected JSON.
    #[error("malformed order response: {0}")]
    Malformed(String),
}

/// Form fields posted to the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub payment_method: PaymentMethod,
    pub total: Money,
    pub delivery_fee: Money,
    /// JSON-encoded line items.
    pub items: String,
}

impl OrderRequest {
    /// Flatten an order into form fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the line items cannot be encoded as JSON.
    pub fn from_order(order: &Order) -> Result<Self, serde_json::Error> {
        let details = order.details();
        Ok(Self {
            full_name: details.full_name().to_owned(),
            phone: details.phone().to_owned(),
            address: details.address().to_owned(),
            city: details.city().to_owned(),
            payment_method: details.payment_method(),
            total: order.total(),
            delivery_fee: order.delivery_fee(),
            items: serde_json::to_string(order.items())?,
        })
    }
}

/// Body returned by the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Order numbers arrive as strings or bare integers depending on the backend.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        },
    )
}

/// Something that accepts orders.
pub trait OrderEndpoint: Send + Sync {
    /// Submit one order.
    fn place_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderResponse, EndpointError>> + Send;
}

/// Order endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderEndpoint {
    client: reqwest::Client,
    url: Url,
}

impl HttpOrderEndpoint {
    /// Build the client for `base_url`/[`ORDER_PATH`].
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn new(client: reqwest::Client, base_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            url: base_url.join(ORDER_PATH)?,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl OrderEndpoint for HttpOrderEndpoint {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderResponse, EndpointError> {
        let response = self.client.post(self.url.clone()).form(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<OrderResponse>(&body) {
            Ok(parsed) => {
                tracing::debug!(status = %status, success = parsed.success, "Order endpoint responded");
                Ok(parsed)
            }
            Err(e) if status.is_success() => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse order response"
                );
                Err(EndpointError::Malformed(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Order endpoint returned non-success status"
                );
                Err(EndpointError::Status(status.as_u16()))
            }
        }
    }
}
