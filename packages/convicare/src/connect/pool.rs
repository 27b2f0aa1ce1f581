use crate::{config::DatabaseConfig, error::Error, log::DATABASE};
use bb8::ErrorSink;
use bb8_postgres::PostgresConnectionManager;
use tokio_postgres::NoTls;
use tracing::{debug, error};

pub type ConnectionManager = PostgresConnectionManager<NoTls>;

///
/// Bounded pool of database connections.
///
/// At most `database.pool_size` connections are open at once. Checkouts wait up to
/// `database.connection_timeout` for a free connection. Broken connections are dropped by
/// the pool and reopened on demand.
///
pub type Pool = bb8::Pool<ConnectionManager>;

pub type PooledClient<'a> = bb8::PooledConnection<'a, ConnectionManager>;

/// Logs connection failures raised inside the pool
#[derive(Clone, Copy, Debug)]
struct LogErrors;

impl ErrorSink<tokio_postgres::Error> for LogErrors {
    fn sink(&self, err: tokio_postgres::Error) {
        error!(target: DATABASE, msg = "Pooled connection error", error = err.to_string());
    }

    fn boxed_clone(&self) -> Box<dyn ErrorSink<tokio_postgres::Error>> {
        Box::new(*self)
    }
}

pub fn builder(config: &DatabaseConfig) -> bb8::Builder<ConnectionManager> {
    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connection_timeout())
        .test_on_check_out(true)
        .error_sink(Box::new(LogErrors))
}

///
/// Creates the pool. No connection is opened until the first checkout.
///
pub async fn pool(config: &DatabaseConfig) -> Result<Pool, Error> {
    debug!(
        target: DATABASE,
        msg = "Creating connection pool",
        database = %config,
        pool_size = config.pool_size
    );

    let manager = PostgresConnectionManager::new(config.to_postgres_config(), NoTls);
    let pool = builder(config).build(manager).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(pool_size: u32) -> DatabaseConfig {
        DatabaseConfig {
            host: DatabaseConfig::default_host(),
            port: DatabaseConfig::default_port(),
            name: "convicare".to_string(),
            username: "convicare".to_string(),
            password: "password".to_string(),
            pool_size,
            connection_timeout: 250,
        }
    }

    #[tokio::test]
    async fn pool_opens_connections_lazily() {
        let config = config(3);
        let manager = PostgresConnectionManager::new(config.to_postgres_config(), NoTls);
        let pool = builder(&config).build_unchecked(manager);

        let state = pool.state();
        assert_eq!(state.connections, 0);
        assert_eq!(state.idle_connections, 0);
    }

    #[tokio::test]
    async fn unreachable_database_fails_checkout() {
        let mut config = config(1);
        // Nothing listens on the discard port
        config.port = 9;
        let manager = PostgresConnectionManager::new(config.to_postgres_config(), NoTls);
        let pool = builder(&config)
            .connection_timeout(Duration::from_millis(250))
            .build_unchecked(manager);

        let err = pool.get().await.map(|_| ()).unwrap_err();
        assert!(matches!(Error::from(err), Error::Pool(_)));
    }
}
