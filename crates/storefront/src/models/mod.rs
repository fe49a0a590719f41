//! Domain models for the ordering client.

pub mod user;

pub use user::CachedUser;
