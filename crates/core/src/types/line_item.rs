//! A single product entry in the cart.

use serde::{Deserialize, Serialize};

use super::id::LineItemId;
use super::money::Money;

/// One product in the cart with its unit price and quantity.
///
/// Serialised with the field names the site has always written to storage
/// (`name`, `price`, `quantity`) plus the stable `id`. Payloads written
/// before ids existed get a fresh one on load.
///
/// Quantities are kept at one or more by [`Cart`](super::cart::Cart); a
/// `LineItem` read from storage is only trusted after
/// [`Cart::from_items`](super::cart::Cart::from_items) has checked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default = "LineItemId::generate")]
    id: LineItemId,
    name: String,
    #[serde(rename = "price")]
    unit_price: Money,
    quantity: u32,
}

impl LineItem {
    /// Create a line item with quantity one.
    #[must_use]
    pub fn new(name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id: LineItemId::generate(),
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> LineItemId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of the whole line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    pub(crate) const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Returns `false` and leaves the quantity alone when it is already one.
    pub(crate) const fn decrement(&mut self) -> bool {
        if self.quantity > 1 {
            self.quantity -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_one() {
        let item = LineItem::new("Burger", Money::new(5000));
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.line_total(), Money::new(5000));
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut item = LineItem::new("Fries", Money::new(2000));
        item.increment();
        assert!(item.decrement());
        assert!(!item.decrement());
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_legacy_payload_without_id() {
        let item: LineItem =
            serde_json::from_str(r#"{"name":"Brochette","price":3500,"quantity":3}"#).unwrap();
        assert_eq!(item.name(), "Brochette");
        assert_eq!(item.unit_price(), Money::new(3500));
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.line_total(), Money::new(10_500));
    }

    #[test]
    fn test_serialized_field_names() {
        let item = LineItem::new("Isombe", Money::new(4000));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["name"], "Isombe");
        assert_eq!(value["price"], 4000);
        assert_eq!(value["quantity"], 1);
        assert_eq!(value["id"], item.id().to_string());
    }
}
