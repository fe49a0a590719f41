//! The cart collection and its invariants.
//!
//! A [`Cart`] holds at most one [`LineItem`] per product name, in insertion
//! order, and never lets a quantity drop below one. Removing a line is a
//! separate, explicit operation. Totals are always derived, never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::LineItemId;
use super::line_item::LineItem;
use super::money::Money;

/// Errors from cart operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Product name is empty or only whitespace.
    #[error("item name cannot be empty")]
    EmptyName,

    /// Position-based operation on a row that does not exist.
    #[error("cart position {index} is out of range (cart has {len} items)")]
    OutOfRange {
        /// Requested position (zero-based).
        index: usize,
        /// Number of line items in the cart.
        len: usize,
    },

    /// Id-based operation on an item that is no longer in the cart.
    #[error("no cart item with id {0}")]
    UnknownItem(LineItemId),

    /// A list of line items breaks a cart invariant.
    #[error("invalid cart contents: {0}")]
    Invalid(String),
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The quantity changed to the contained value.
    Changed(u32),
    /// The change was refused because the quantity is already one.
    Refused,
}

/// Derived money values for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

/// Ordered collection of line items with unique names.
///
/// ```
/// use movenpick_core::{Cart, Money};
///
/// let mut cart = Cart::new();
/// cart.add("Burger", Money::new(5000)).unwrap();
/// cart.add("Burger", Money::new(5000)).unwrap();
/// cart.add("Fries", Money::new(2000)).unwrap();
///
/// assert_eq!(cart.len(), 2);
/// assert_eq!(cart.subtotal(), Money::new(12_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously stored line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Invalid`] when any item has an empty name or a
    /// zero quantity, or when two items share a name or an id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        for (i, item) in items.iter().enumerate() {
            if item.name().trim().is_empty() {
                return Err(CartError::Invalid(format!("item {i} has an empty name")));
            }
            if item.quantity() == 0 {
                return Err(CartError::Invalid(format!(
                    "item {:?} has quantity 0",
                    item.name()
                )));
            }
            let mut earlier = items.iter().take(i);
            if earlier.clone().any(|other| other.name() == item.name()) {
                return Err(CartError::Invalid(format!(
                    "duplicate item {:?}",
                    item.name()
                )));
            }
            if earlier.any(|other| other.id() == item.id()) {
                return Err(CartError::Invalid(format!("duplicate id {}", item.id())));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all lines (the cart badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.quantity()))
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Resolve a zero-based position to the id of the item shown there.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] when there is no item at `index`.
    pub fn id_at(&self, index: usize) -> Result<LineItemId, CartError> {
        self.items
            .get(index)
            .map(LineItem::id)
            .ok_or(CartError::OutOfRange {
                index,
                len: self.items.len(),
            })
    }

    /// Add one unit of a product.
    ///
    /// If a line with the same name exists its quantity goes up by one and
    /// its original unit price is kept; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyName`] for a blank name.
    pub fn add(&mut self, name: &str, unit_price: Money) -> Result<LineItemId, CartError> {
        if name.trim().is_empty() {
            return Err(CartError::EmptyName);
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.name() == name) {
            existing.increment();
            return Ok(existing.id());
        }

        let item = LineItem::new(name, unit_price);
        let id = item.id();
        self.items.push(item);
        Ok(id)
    }

    /// Increase the quantity of a line by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart.
    pub fn increment(&mut self, id: LineItemId) -> Result<Adjustment, CartError> {
        let item = self.get_mut(id)?;
        item.increment();
        Ok(Adjustment::Changed(item.quantity()))
    }

    /// Decrease the quantity of a line by one, refusing to go below one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart.
    pub fn decrement(&mut self, id: LineItemId) -> Result<Adjustment, CartError> {
        let item = self.get_mut(id)?;
        if item.decrement() {
            Ok(Adjustment::Changed(item.quantity()))
        } else {
            Ok(Adjustment::Refused)
        }
    }

    /// Delete a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart.
    pub fn remove(&mut self, id: LineItemId) -> Result<LineItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(CartError::UnknownItem(id))?;
        Ok(self.items.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Subtotal, delivery fee and grand total.
    #[must_use]
    pub fn totals(&self, delivery_fee: Money) -> Totals {
        let subtotal = self.subtotal();
        Totals {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    fn get_mut(&mut self, id: LineItemId) -> Result<&mut LineItem, CartError> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(CartError::UnknownItem(id))
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}
