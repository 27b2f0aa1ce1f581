use serde::Deserialize;
use std::{fmt::Display, time::Duration};

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,

    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,

    pub name: String,
    pub username: String,
    pub password: String,

    #[serde(default = "DatabaseConfig::default_pool_size")]
    pub pool_size: u32,

    #[serde(default = "DatabaseConfig::default_connection_timeout")]
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    pub fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    pub const fn default_port() -> u16 {
        5432
    }

    pub const fn default_pool_size() -> u32 {
        10
    }

    // 30 seconds
    pub const fn default_connection_timeout() -> u64 {
        1000 * 30
    }

    pub fn to_socket_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout)
    }

    pub fn to_postgres_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.name)
            .user(&self.username)
            .password(&self.password)
            .application_name("convicare")
            .connect_timeout(self.connection_timeout());
        config
    }
}

///
/// Password is NEVER EVER displayed
///
impl Display for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            host: DatabaseConfig::default_host(),
            port: DatabaseConfig::default_port(),
            name: "convicare".to_string(),
            username: "clinic".to_string(),
            password: "s3cr3t".to_string(),
            pool_size: DatabaseConfig::default_pool_size(),
            connection_timeout: DatabaseConfig::default_connection_timeout(),
        }
    }

    #[test]
    fn display_never_includes_password() {
        let config = config();
        let display = config.to_string();
        assert_eq!(display, "clinic@127.0.0.1:5432/convicare");
        assert!(!display.contains("s3cr3t"));
    }

    #[test]
    fn postgres_config_carries_credentials() {
        let pg = config().to_postgres_config();
        assert_eq!(pg.get_dbname(), Some("convicare"));
        assert_eq!(pg.get_user(), Some("clinic"));
        assert_eq!(pg.get_password(), Some("s3cr3t".as_bytes()));
        assert_eq!(pg.get_ports(), &[5432]);
    }
}
