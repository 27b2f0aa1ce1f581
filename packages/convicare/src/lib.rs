pub mod auth;
pub mod cli;
pub mod config;
pub mod connect;
pub mod error;
pub mod lifecycle;
pub mod log;
pub mod model;
pub mod prometheus;
pub mod report;
pub mod repository;
pub mod web;

pub use crate::cli::Args;
pub use crate::cli::Migrate;
pub use crate::config::{AppConfig, DatabaseConfig, ServerConfig, SessionConfig};
pub use crate::log::init;
pub use crate::web::{router, AppState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub mod test_helpers;
