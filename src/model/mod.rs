//! Wire models and request DTOs, split into domain-specific modules.

pub mod product;
pub mod user;

pub use product::*;
pub use user::*;
