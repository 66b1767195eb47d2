pub mod code;
pub mod error;
pub mod root_path;
pub mod seed;
pub mod user;

pub use code::*;
pub use error::*;
pub use root_path::*;
pub use seed::*;
pub use user::*;
