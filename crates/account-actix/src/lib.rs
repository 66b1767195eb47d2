//! Actix-web HTTP surface for the Account App.
//!
//! This crate contains the framework-specific code (handlers, actors, templates).
//! Domain types live in `account-core`, while storage is abstracted behind `account-ports`.

pub mod actors;
pub mod handlers;
pub mod headers;
pub mod params;
pub mod session;
pub mod state;
pub mod templates;

pub use state::AppState;
pub use templates::Templates;
