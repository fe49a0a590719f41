//! Clients for the site's server-side services.
//!
//! # Services
//!
//! - `auth` - Login, signup and logout against the PHP auth endpoints

pub mod auth;
