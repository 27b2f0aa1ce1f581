mod migrate;

use crate::{
    config::{AppConfig, LogConfig, LogFormat, LogLevel, DEFAULT_CONFIG_FILE_PATH},
    error::Error,
    log::MIGRATE,
};
use clap::{Parser, Subcommand};
use tracing::debug;

pub use migrate::Migrate;

#[derive(Clone, Debug, Parser)]
#[command(version, about, verbatim_doc_comment)]
///
/// ConviCare
///
/// Clinic management: patient intake, clinical histories, pharmacy orders and reports.
///
pub struct Args {
    /// Optional path to a ConviCare configuration file.
    ///
    /// Default is "convicare.toml".
    /// Configuration is loaded from this file, if present.
    /// Environment variables are used instead of the file or to override any values defined in the file.
    #[arg(short = 'p', long, default_value = DEFAULT_CONFIG_FILE_PATH, verbatim_doc_comment, global = true)]
    pub config_file_path: String,

    ///
    /// Optional log level.
    ///
    #[arg(short, long, value_enum, default_value_t = LogConfig::default_log_level(), env = "CV_LOG__LEVEL", global = true)]
    pub log_level: LogLevel,

    ///
    /// Optional log format. Default level is "pretty" if running in a terminal session, otherwise "structured".
    ///
    #[arg(short='f', long, value_enum, default_value_t = LogConfig::default_log_format(), env = "CV_LOG__FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    Migrate(Migrate),
}

///
/// Runs command specified in command line
/// Returns Ok(true) if the caller should exit
///
pub async fn run(args: &Args, config: &AppConfig) -> Result<bool, Error> {
    match &args.command {
        Some(Commands::Migrate(migrate)) => {
            debug!(target: MIGRATE, ?migrate);
            migrate.run(config).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
