//! Library exports.
//!
//! The Account App is split into workspace crates; this facade keeps a single
//! import path for the binaries and the end-to-end tests.

pub use account_actix as http;
pub use account_config as config;
pub use account_core as core;
pub use account_observability as observability;
pub use account_ports as ports;
pub use account_server as server;
pub use account_storage_sqlx as storage;
