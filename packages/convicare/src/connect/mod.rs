mod pool;

use crate::{
    config::{DatabaseConfig, ServerConfig},
    error::Error,
    log::DATABASE,
};
use std::time::Duration;
use tokio::{net::TcpListener, time};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

pub use pool::{pool, ConnectionManager, Pool, PooledClient};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);
const MAX_RETRY_COUNT: u32 = 3;

///
/// Opens a new database connection.
///
/// The connection future is driven by a spawned task, errors are logged when it ends.
///
pub async fn database(config: &DatabaseConfig) -> Result<Client, Error> {
    debug!(target: DATABASE, msg = "Connecting to database", database = %config);

    let (client, connection) = match config.to_postgres_config().connect(NoTls).await {
        Ok((client, connection)) => (client, connection),
        Err(e) => {
            error!(
                msg = "Could not connect to database",
                database = config.name,
                host = config.host,
                port = config.port,
                username = config.username,
            );
            error!(msg = "Confirm that the database configuration is correct");
            return Err(Error::Database(e));
        }
    };

    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(target: DATABASE, msg = "Connection error", error = err.to_string());
        }
    });
    Ok(client)
}

pub async fn bind_with_retry(server: &ServerConfig) -> TcpListener {
    let address = &server.to_socket_address();
    let mut retry_count = 0;

    loop {
        match TcpListener::bind(address).await {
            Ok(listener) => {
                info!(msg = "Server waiting for connections", address);
                return listener;
            }
            Err(err) => {
                if retry_count > MAX_RETRY_COUNT {
                    error!(
                        msg = "Error binding connection",
                        retries = MAX_RETRY_COUNT,
                        error = err.to_string()
                    );
                    std::process::exit(exitcode::CONFIG);
                }
            }
        };
        let sleep_duration_ms =
            (100 * 2_u64.pow(retry_count)).min(MAX_RETRY_DELAY.as_millis() as _);
        time::sleep(Duration::from_millis(sleep_duration_ms)).await;

        retry_count += 1;
    }
}
