//! Checkout command.

use clap::Args;
use movenpick_core::CheckoutForm;
use movenpick_storefront::error::AppError;
use movenpick_storefront::notify::Notification;
use movenpick_storefront::state::AppState;

use super::output;

/// Delivery details for `checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Recipient's full name
    #[arg(long)]
    pub full_name: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Delivery address
    #[arg(long)]
    pub address: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// Payment method (`cash`, `card`, `mobile-money`)
    #[arg(long)]
    pub payment: Option<String>,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            full_name: args.full_name,
            phone: args.phone,
            address: args.address,
            city: args.city,
            payment_method: args.payment,
        }
    }
}

/// Submit the cart as an order.
///
/// # Errors
///
/// Returns an error if validation or submission fails. The cart is kept.
pub async fn place_order(state: &mut AppState, args: CheckoutArgs) -> Result<(), AppError> {
    let summary = state.cart_view().render_text()?;
    let confirmation = state.checkout(&CheckoutForm::from(args)).await?;

    output(summary.trim_end());
    output("");
    output(Notification::order_placed(&confirmation));
    output(Notification::order_details(&confirmation));
    Ok(())
}
