//! User-facing flows: the orchestration layer between the CLI surface and
//! the typed API endpoints.

pub mod auth;
pub mod catalog;
pub mod product;
pub mod validation;

pub use auth::AuthFlow;
pub use catalog::Catalog;
pub use product::{save_product, toggle_product, ImageFailure, ImageItem, SaveReport};
