//! Framework-agnostic domain types and helpers for the Account App.
//!
//! The HTTP layer (`account-actix`) and the storage adapters depend on this crate;
//! it carries no web framework or database code unless the matching feature is on.

pub mod models;
pub mod password;
pub mod random;

pub use models::*;
