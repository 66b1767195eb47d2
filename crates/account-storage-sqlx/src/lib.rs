//! SQLx storage adapter (SQLite and Postgres) for the Account App.

mod sqlx;

pub use crate::sqlx::SqlxStorage;
