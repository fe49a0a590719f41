//! Menu listing command.

use askama::Template;
use clap::Args;
use movenpick_core::Money;
use movenpick_storefront::error::AppError;
use movenpick_storefront::menu::{MenuListTemplate, MenuQuery};
use movenpick_storefront::state::AppState;

use super::output;

/// Filters for `menu`.
#[derive(Debug, Default, Args)]
pub struct MenuArgs {
    /// Only this category (`all` for every category)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Text to find in item names and descriptions
    #[arg(short, long)]
    pub search: Option<String>,

    /// Minimum price in RWF
    #[arg(long)]
    pub min: Option<u64>,

    /// Maximum price in RWF
    #[arg(long)]
    pub max: Option<u64>,
}

impl From<&MenuArgs> for MenuQuery {
    fn from(args: &MenuArgs) -> Self {
        Self {
            category: args.category.clone(),
            search: args.search.clone(),
            min_price: args.min.map(Money::new),
            max_price: args.max.map(Money::new),
        }
    }
}

/// Print the menu narrowed by `args`.
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded or rendered.
pub fn list(state: &AppState, args: &MenuArgs) -> Result<(), AppError> {
    let menu = state.load_menu()?;
    let listing = MenuListTemplate::new(&menu, &MenuQuery::from(args));
    if listing.items.is_empty() && listing.summary.is_none() {
        output("No menu items match.");
        return Ok(());
    }
    output(listing.render()?.trim_end());
    Ok(())
}
