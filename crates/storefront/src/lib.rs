//! Movenpick ordering client library.
//!
//! Cart, checkout, account and menu logic for the Movenpick restaurant
//! site, independent of any particular front end. The `movenpick` CLI is
//! one front end; the HTML fragments rendered here serve the web pages.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod busy;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod i18n;
pub mod menu;
pub mod models;
pub mod notify;
pub mod preferences;
pub mod services;
pub mod state;
pub mod storage;
