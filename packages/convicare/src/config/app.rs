use super::session::MIN_SECRET_LEN;
use super::{
    DatabaseConfig, LogConfig, ServerConfig, SessionConfig, CV_PREFIX, DEFAULT_CONFIG_FILE_PATH,
};
use crate::config::LogFormat;
use crate::error::{ConfigError, Error};
use crate::Args;
use config::{Config, Environment};
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PrometheusConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "PrometheusConfig::default_port")]
    pub port: u16,
}

/// Config defaults to a file called `convicare.toml` in the current directory.
/// Variable names should match the struct field names.
///
/// ENV vars can be used to override file settings.
///
/// ENV vars must be prefixed with `CV_`.
///
impl AppConfig {
    pub fn default_path() -> String {
        DEFAULT_CONFIG_FILE_PATH.to_string()
    }

    pub fn load(args: &Args) -> Result<AppConfig, Error> {
        // Log a warning to user that config file is missing
        if !PathBuf::from(&args.config_file_path).exists() {
            println!(
                "Configuration file was not found: {}",
                args.config_file_path
            );
            println!("Loading config values from environment variables.");
        }
        let mut config = AppConfig::build(&args.config_file_path)?;

        // If log level is default, it has not been set by the user in config
        if config.log.level == LogConfig::default_log_level() {
            config.log.level = args.log_level;
        }

        // If log format is default, it has not been set by the user in config
        if config.log.format == LogConfig::default_log_format() {
            config.log.format = args.log_format;
        }

        Ok(config)
    }

    pub fn build(path: &str) -> Result<Self, Error> {
        // For parsing top-level values such as CV_HOST, CV_PORT
        // and for parsing nested env values such as CV_DATABASE__HOST, CV_DATABASE__PORT
        let cv_env_source = Environment::with_prefix(CV_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_");

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(cv_env_source)
            .build()?
            .try_deserialize()
            .map_err(parameter_error)?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SessionSecretTooShort {
                min: MIN_SECRET_LEN,
            });
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "database.pool_size".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn use_structured_logging(&self) -> bool {
        matches!(self.log.format, LogFormat::Structured)
    }

    ///
    /// Returns true if Prometheus export is enabled
    ///
    pub fn prometheus_enabled(&self) -> bool {
        self.prometheus.enabled
    }
}

impl PrometheusConfig {
    pub fn default_port() -> u16 {
        9930
    }
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        PrometheusConfig {
            enabled: false,
            port: PrometheusConfig::default_port(),
        }
    }
}

///
/// Names the offending parameter of a deserialization failure.
///
/// Missing fields arrive as `NotFound` with the dotted path, eg `session.secret`.
/// Bad enum values arrive as a `Message`, possibly wrapped in `At` with the key.
///
fn parameter_error(err: config::ConfigError) -> Error {
    match err {
        config::ConfigError::NotFound(name) => ConfigError::MissingParameter { name }.into(),
        config::ConfigError::At {
            error,
            origin,
            key: Some(key),
        } => match *error {
            config::ConfigError::Message(ref s) if s.contains("does not have variant constructor") => {
                let (_, value) = extract_invalid_field(s);
                ConfigError::InvalidParameter { name: key, value }.into()
            }
            error => config::ConfigError::At {
                error: Box::new(error),
                origin,
                key: Some(key),
            }
            .into(),
        },
        config::ConfigError::Message(s) => {
            if s.contains("missing field") {
                let name = extract_field_name(&s).map_or("unknown".to_string(), |s| s);
                ConfigError::MissingParameter { name }.into()
            } else if s.contains("does not have variant constructor") {
                let (name, value) = extract_invalid_field(&s);
                ConfigError::InvalidParameter { name, value }.into()
            } else {
                config::ConfigError::Message(s).into()
            }
        }
        _ => err.into(),
    }
}

///
/// Extracts a field name (if present) from a config::ConfigError::Message
/// This is called when a ConfigError message contains the string `missing field`
///
fn extract_field_name(input: &str) -> Option<String> {
    let re = Regex::new(r"`(\w+)`").ok()?;
    re.captures(input)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

///
/// Extracts a field name (if present) from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `does not have variant constructor`
///
/// Error string is `enum {name} does not have variant constructor {value}`
///
fn extract_invalid_field(input: &str) -> (String, String) {
    let words = input.split(' ').collect::<Vec<_>>();

    let default_name = "unknown".to_string();
    let default_val = "".to_string();

    if !input.starts_with("enum") {
        return (default_name, default_val);
    }

    let name = words
        .get(1)
        .map_or(default_name.to_owned(), |w| w.to_string());

    let value = words
        .last()
        .map_or(default_val.to_owned(), |w| w.to_string());

    (name, value)
}
