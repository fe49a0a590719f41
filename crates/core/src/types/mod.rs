//! Core types for the Movenpick ordering client.
//!
//! This module provides type-safe wrappers for the cart and checkout domain.

pub mod cart;
pub mod delivery;
pub mod email;
pub mod id;
pub mod line_item;
pub mod money;
pub mod payment;
pub mod phone;

pub use cart::{Adjustment, Cart, CartError, Totals};
pub use delivery::{CheckoutForm, DeliveryDetails, DeliveryField, ValidationError};
pub use email::{Email, EmailError};
pub use id::{LineItemId, UserId};
pub use line_item::LineItem;
pub use money::Money;
pub use payment::{PaymentMethod, PaymentMethodError};
pub use phone::{Phone, PhoneError};
