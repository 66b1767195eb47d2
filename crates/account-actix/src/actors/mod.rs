pub mod user_actor;

pub use user_actor::*;
