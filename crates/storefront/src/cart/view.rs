//! Cart rendering.
//!
//! The view is a subscriber of the [`CartStore`](super::CartStore). Every
//! render reads the newest [`CartSnapshot`] and re-renders the whole list and
//! totals block; there is no incremental diffing. Row controls carry the
//! line item's stable id, never its position.
//!
//! Rendering is pull-based: a front end renders when it needs output, and
//! the watch channel guarantees it sees the latest published state.

use askama::Template;
use tokio::sync::watch;

use super::{CartSnapshot, CartStore};
use crate::busy::BusyFlag;

/// Cart row display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    /// One-based row number, for text front ends.
    pub position: usize,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub can_decrement: bool,
}

/// Totals block display data.
#[derive(Debug, Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub delivery: String,
    pub total: String,
}

impl From<&CartSnapshot> for TotalsView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            subtotal: snapshot.totals.subtotal.to_string(),
            delivery: snapshot.totals.delivery_fee.to_string(),
            total: snapshot.totals.total.to_string(),
        }
    }
}

fn item_views(snapshot: &CartSnapshot) -> Vec<CartItemView> {
    snapshot
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| CartItemView {
            id: item.id().to_string(),
            position: i + 1,
            name: item.name().to_owned(),
            quantity: item.quantity(),
            price: item.unit_price().to_string(),
            line_price: item.line_total().to_string(),
            can_decrement: item.quantity() > 1,
        })
        .collect()
}

/// Cart items fragment: rows, totals and checkout button.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub items: Vec<CartItemView>,
    pub totals: TotalsView,
    pub busy: bool,
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Hover preview of the cart.
#[derive(Template)]
#[template(path = "partials/cart_preview.html")]
pub struct CartPreviewTemplate {
    pub items: Vec<CartItemView>,
    pub total: String,
}

/// Plain-text cart for terminals.
#[derive(Template)]
#[template(path = "cart/summary.txt")]
pub struct CartSummaryTemplate {
    pub items: Vec<CartItemView>,
    pub totals: TotalsView,
}

/// Projects cart snapshots into rendered fragments.
pub struct CartView {
    updates: watch::Receiver<CartSnapshot>,
    busy: BusyFlag,
}

impl CartView {
    /// Subscribe to `store`. `busy` is the order submitter's flag and drives
    /// the checkout button state.
    #[must_use]
    pub fn new(store: &CartStore, busy: BusyFlag) -> Self {
        Self {
            updates: store.subscribe(),
            busy,
        }
    }

    /// Newest snapshot, marking it as seen.
    pub fn latest(&mut self) -> CartSnapshot {
        self.updates.borrow_and_update().clone()
    }

    /// Render the cart items fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_items(&mut self) -> askama::Result<String> {
        let snapshot = self.latest();
        CartItemsTemplate {
            items: item_views(&snapshot),
            totals: TotalsView::from(&snapshot),
            busy: self.busy.is_busy(),
        }
        .render()
    }

    /// Render the count badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_count(&mut self) -> askama::Result<String> {
        let snapshot = self.latest();
        CartCountTemplate {
            count: snapshot.item_count,
        }
        .render()
    }

    /// Render the hover preview, or `None` for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_preview(&mut self) -> askama::Result<Option<String>> {
        let snapshot = self.latest();
        if snapshot.is_empty() {
            return Ok(None);
        }
        CartPreviewTemplate {
            items: item_views(&snapshot),
            total: snapshot.totals.subtotal.to_string(),
        }
        .render()
        .map(Some)
    }

    /// Render the cart as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_text(&mut self) -> askama::Result<String> {
        let snapshot = self.latest();
        CartSummaryTemplate {
            items: item_views(&snapshot),
            totals: TotalsView::from(&snapshot),
        }
        .render()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use movenpick_core::Money;

    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> CartStore {
        CartStore::load(Arc::new(MemoryStorage::new()), Money::new(2000))
    }

    #[test]
    fn test_empty_cart_placeholder() {
        let store = store();
        let mut view = CartView::new(&store, BusyFlag::new());
        let html = view.render_items().unwrap();
        assert!(html.contains("cart-empty"));
        assert!(!html.contains("cart-item"));
        assert!(!html.contains("placeOrderBtn"));
        assert_eq!(view.render_preview().unwrap(), None);
    }

    #[test]
    fn test_rows_bind_stable_ids() {
        let mut store = store();
        let burger = store.add_item("Burger", Money::new(5000)).unwrap();
        store.add_item("Burger", Money::new(5000)).unwrap();
        let fries = store.add_item("Fries", Money::new(2000)).unwrap();

        let mut view = CartView::new(&store, BusyFlag::new());
        let html = view.render_items().unwrap();
        assert!(html.contains(&format!("data-line-id=\"{burger}\"")));
        assert!(html.contains(&format!("data-line-id=\"{fries}\"")));
        assert!(html.contains("5,000 RWF each"));
        assert!(html.contains("10,000 RWF"));
        assert!(html.contains("14,000 RWF"));
    }

    #[test]
    fn test_rerender_after_removal_uses_fresh_snapshot() {
        let mut store = store();
        let burger = store.add_item("Burger", Money::new(5000)).unwrap();
        store.add_item("Fries", Money::new(2000)).unwrap();
        let mut view = CartView::new(&store, BusyFlag::new());
        assert!(view.render_items().unwrap().contains("Burger"));

        store.remove_item(burger, &mut |_: &str| true).unwrap();
        let html = view.render_items().unwrap();
        assert!(!html.contains("Burger"));
        assert!(html.contains("Fries"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut store = store();
        store
            .add_item("<script>alert(1)</script>", Money::new(100))
            .unwrap();
        let mut view = CartView::new(&store, BusyFlag::new());
        let html = view.render_items().unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_checkout_disabled_while_busy() {
        let mut store = store();
        store.add_item("Burger", Money::new(5000)).unwrap();
        let busy = BusyFlag::new();
        let mut view = CartView::new(&store, busy.clone());

        assert!(!view.render_items().unwrap().contains("Processing..."));
        let _guard = busy.try_acquire().unwrap();
        let html = view.render_items().unwrap();
        assert!(html.contains("disabled"));
        assert!(html.contains("Processing..."));
    }

    #[test]
    fn test_count_and_preview() {
        let mut store = store();
        store.add_item("Burger", Money::new(5000)).unwrap();
        store.add_item("Burger", Money::new(5000)).unwrap();
        let mut view = CartView::new(&store, BusyFlag::new());

        assert!(view.render_count().unwrap().contains('2'));
        let preview = view.render_preview().unwrap().unwrap();
        assert!(preview.contains("Burger x2"));
        assert!(preview.contains("10,000 RWF"));
    }

    #[test]
    fn test_text_rendering() {
        let mut store = store();
        let mut view = CartView::new(&store, BusyFlag::new());
        assert!(view.render_text().unwrap().contains("Your cart is empty"));

        store.add_item("Fries", Money::new(2000)).unwrap();
        let text = view.render_text().unwrap();
        assert!(text.contains("1. Fries x1"));
        assert!(text.contains("Total: 4,000 RWF"));
    }

    #[test]
    fn test_render_sees_latest_of_many_mutations() {
        let mut store = store();
        let mut view = CartView::new(&store, BusyFlag::new());
        let tea = store.add_item("Tea", Money::new(1000)).unwrap();
        store.increment(tea).unwrap();
        store.add_item("Fries", Money::new(2000)).unwrap();

        let snapshot = view.latest();
        assert_eq!(snapshot.revision, 3);
        assert_eq!(snapshot.item_count, 3);
        assert!(view.render_count().unwrap().contains(">3</span>"));
    }
}
