//! Cart store: the single owner of cart contents.
//!
//! The store wraps a [`Cart`] with persistence and change notification.
//! Every mutation follows the same path:
//!
//! ```text
//! gesture -> CartStore mutation -> write `cart` key -> publish CartSnapshot -> view re-renders
//! ```
//!
//! Subscribers receive snapshots over a `tokio::sync::watch` channel, so a
//! view always renders (and binds its controls to) the latest state.

pub mod view;

use movenpick_core::{Adjustment, Cart, CartError, LineItem, LineItemId, Money, Totals};
use tokio::sync::watch;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::storage::{SharedStorage, keys, read_json, write_json};

pub use view::CartView;

/// Prompt shown before a line item is deleted.
pub const REMOVE_PROMPT: &str = "Remove this item from cart?";

/// A cancellable confirmation step.
pub trait Confirm {
    /// Ask the user; `true` means go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a removal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The line was deleted.
    Removed(LineItem),
    /// The user declined the confirmation; nothing changed.
    Cancelled,
}

/// Immutable view of the cart published after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Increases by one with every published change.
    pub revision: u64,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    /// Sum of quantities.
    pub item_count: u32,
}

impl CartSnapshot {
    fn of(cart: &Cart, delivery_fee: Money, revision: u64) -> Self {
        Self {
            revision,
            items: cart.items().to_vec(),
            totals: cart.totals(delivery_fee),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Owner of the session's cart.
///
/// Constructed once per session and passed by reference to the view and
/// the order submitter.
pub struct CartStore {
    cart: Cart,
    storage: SharedStorage,
    delivery_fee: Money,
    revision: u64,
    updates: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Rehydrate the cart from storage.
    ///
    /// A missing key gives an empty cart. A payload that does not parse or
    /// breaks a cart invariant is logged and also gives an empty cart.
    pub fn load(storage: SharedStorage, delivery_fee: Money) -> Self {
        let cart = read_json::<Cart>(storage.as_ref(), keys::CART).unwrap_or_default();
        tracing::debug!(items = cart.len(), "Cart loaded from storage");

        let (updates, _) = watch::channel(CartSnapshot::of(&cart, delivery_fee, 0));
        Self {
            cart,
            storage,
            delivery_fee,
            revision: 0,
            updates,
        }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::of(&self.cart, self.delivery_fee, self.revision)
    }

    /// Receive a snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Subtotal, delivery fee and total of the current cart. No side effects.
    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        self.cart.totals(self.delivery_fee)
    }

    /// Add one unit of `name`, merging with an existing line of that name.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyName`] for a blank name.
    #[instrument(skip(self))]
    pub fn add_item(&mut self, name: &str, unit_price: Money) -> Result<LineItemId, CartError> {
        let id = self.cart.add(name, unit_price)?;
        add_breadcrumb("cart", "Added item", Some(&[("name", name)]));
        self.commit();
        Ok(id)
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart.
    pub fn increment(&mut self, id: LineItemId) -> Result<Adjustment, CartError> {
        let adjustment = self.cart.increment(id)?;
        self.commit();
        Ok(adjustment)
    }

    /// Decrease a line's quantity by one.
    ///
    /// At quantity one the change is refused: nothing is written and no
    /// snapshot is published.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart.
    pub fn decrement(&mut self, id: LineItemId) -> Result<Adjustment, CartError> {
        let adjustment = self.cart.decrement(id)?;
        if adjustment == Adjustment::Refused {
            tracing::debug!(%id, "Decrement refused at quantity 1");
        } else {
            self.commit();
        }
        Ok(adjustment)
    }

    /// Position-based [`increment`](Self::increment).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] for a bad position.
    pub fn increment_at(&mut self, index: usize) -> Result<Adjustment, CartError> {
        let id = self.cart.id_at(index)?;
        self.increment(id)
    }

    /// Position-based [`decrement`](Self::decrement).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] for a bad position.
    pub fn decrement_at(&mut self, index: usize) -> Result<Adjustment, CartError> {
        let id = self.cart.id_at(index)?;
        self.decrement(id)
    }

    /// Delete a line after asking `confirm`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if `id` is not in the cart. The
    /// check happens before the user is asked.
    pub fn remove_item(
        &mut self,
        id: LineItemId,
        confirm: &mut impl Confirm,
    ) -> Result<Removal, CartError> {
        if self.cart.get(id).is_none() {
            return Err(CartError::UnknownItem(id));
        }
        if !confirm.confirm(REMOVE_PROMPT) {
            return Ok(Removal::Cancelled);
        }

        let removed = self.cart.remove(id)?;
        add_breadcrumb("cart", "Removed item", Some(&[("name", removed.name())]));
        self.commit();
        Ok(Removal::Removed(removed))
    }

    /// Position-based [`remove_item`](Self::remove_item).
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] for a bad position.
    pub fn remove_at(
        &mut self,
        index: usize,
        confirm: &mut impl Confirm,
    ) -> Result<Removal, CartError> {
        let id = self.cart.id_at(index)?;
        self.remove_item(id, confirm)
    }

    /// Empty the cart and erase the persisted copy.
    pub fn clear(&mut self) {
        self.cart.clear();
        if let Err(e) = self.storage.remove(keys::CART) {
            tracing::error!(error = %e, "Failed to erase stored cart");
        }
        self.publish();
    }

    /// Persist, then notify.
    fn commit(&mut self) {
        if let Err(e) = write_json(self.storage.as_ref(), keys::CART, &self.cart) {
            tracing::error!(error = %e, "Failed to persist cart");
            add_breadcrumb("storage", "Cart write failed", None);
        }
        self.publish();
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.updates.send_replace(self.snapshot());
    }
}
