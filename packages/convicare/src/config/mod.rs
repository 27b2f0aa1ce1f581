mod app;
mod database;
mod log;
mod server;
mod session;

pub use app::{AppConfig, PrometheusConfig};
pub use database::DatabaseConfig;
pub use log::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use server::ServerConfig;
pub use session::SessionConfig;

pub const CV_PREFIX: &str = "CV";
pub const DEFAULT_CONFIG_FILE_PATH: &str = "convicare.toml";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 2000;
