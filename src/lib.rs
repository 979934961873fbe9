pub mod api;
pub mod cli;
pub mod config;
pub mod flow;
pub mod model;
pub mod session;

pub use api::ApiError;
