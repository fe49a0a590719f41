//! Movenpick Core - Shared domain types.
//!
//! This crate provides the types used across the Movenpick ordering client:
//! - `storefront` - Cart store, checkout, auth client, menu and preferences
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. Every cart invariant (unique names, quantity floor of one)
//! is enforced here so that the storefront layer only deals with persistence
//! and presentation.
//!
//! # Modules
//!
//! - [`types`] - Ids, money, line items, the cart collection, payment methods,
//!   delivery details and the contact fields of the account forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
