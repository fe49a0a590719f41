//! Cart commands.
//!
//! Rows are the one-based positions printed by `cart show`. Each invocation
//! reloads the cart from storage, so a row always refers to the latest
//! saved order of items.

use movenpick_core::{Adjustment, Money};
use movenpick_storefront::cart::Removal;
use movenpick_storefront::error::AppError;
use movenpick_storefront::notify::Notification;
use movenpick_storefront::state::AppState;

use super::{confirm, output, row_index};

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the summary fails to render.
pub fn show(state: &AppState) -> Result<(), AppError> {
    let text = state.cart_view().render_text()?;
    output(text.trim_end());
    Ok(())
}

/// Add one unit of `name`, priced from the menu unless `price` is given.
///
/// # Errors
///
/// Returns an error if the item is not on the menu and no price is given.
pub fn add(state: &mut AppState, name: &str, price: Option<u64>) -> Result<(), AppError> {
    let (name, price) = match price {
        Some(price) => (name.trim().to_string(), Money::new(price)),
        None => {
            let menu = state.load_menu()?;
            let item = menu.find(name)?;
            (item.name.clone(), item.price)
        }
    };

    state.cart_mut().add_item(&name, price)?;
    output(Notification::added_to_cart(&name));
    Ok(())
}

/// Increase the quantity of `row`.
///
/// # Errors
///
/// Returns an error if `row` is not in the cart.
pub fn increment(state: &mut AppState, row: usize) -> Result<(), AppError> {
    let adjustment = state.cart_mut().increment_at(row_index(row)?)?;
    report_adjustment(state, row, adjustment);
    Ok(())
}

/// Decrease the quantity of `row`, stopping at 1.
///
/// # Errors
///
/// Returns an error if `row` is not in the cart.
pub fn decrement(state: &mut AppState, row: usize) -> Result<(), AppError> {
    let adjustment = state.cart_mut().decrement_at(row_index(row)?)?;
    report_adjustment(state, row, adjustment);
    Ok(())
}

fn report_adjustment(state: &AppState, row: usize, adjustment: Adjustment) {
    let name = row
        .checked_sub(1)
        .and_then(|i| state.cart().cart().items().get(i))
        .map_or("Item", |item| item.name());
    match adjustment {
        Adjustment::Changed(quantity) => output(format!("{name} x{quantity}")),
        Adjustment::Refused => output(Notification::info(format!(
            "{name} is already at 1. Use `cart remove {row}` to delete it."
        ))),
    }
}

/// Remove `row`, asking first unless `yes`.
///
/// # Errors
///
/// Returns an error if `row` is not in the cart.
pub fn remove(state: &mut AppState, row: usize, yes: bool) -> Result<(), AppError> {
    let index = row_index(row)?;
    let removal = if yes {
        state.cart_mut().remove_at(index, &mut |_: &str| true)?
    } else {
        state.cart_mut().remove_at(index, &mut |prompt: &str| confirm(prompt))?
    };

    match removal {
        Removal::Removed(item) => output(format!("Removed {}", item.name())),
        Removal::Cancelled => output("Nothing removed"),
    }
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &mut AppState) {
    state.cart_mut().clear();
    output("Cart cleared");
}

/// Print the total quantity.
pub fn count(state: &AppState) {
    output(state.cart().cart().item_count());
}
