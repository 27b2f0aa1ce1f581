use serde::Deserialize;
use std::time::Duration;

pub const MIN_SECRET_LEN: usize = 16;

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    /// Signs session cookies
    pub secret: String,

    #[serde(default = "SessionConfig::default_cookie_name")]
    pub cookie_name: String,

    /// Seconds
    #[serde(default = "SessionConfig::default_ttl")]
    pub ttl: u64,

    /// Only send the cookie over HTTPS
    #[serde(default)]
    pub secure: bool,
}

impl SessionConfig {
    pub fn with_secret(secret: &str) -> Self {
        SessionConfig {
            secret: secret.to_string(),
            cookie_name: SessionConfig::default_cookie_name(),
            ttl: SessionConfig::default_ttl(),
            secure: false,
        }
    }

    pub fn default_cookie_name() -> String {
        "convicare_session".to_string()
    }

    // 8 hours, one shift
    pub const fn default_ttl() -> u64 {
        60 * 60 * 8
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}
