use clap::Parser;
use convicare::auth::SessionStore;
use convicare::config::AppConfig;
use convicare::error::Error;
use convicare::connect::{self, Pool};
use convicare::repository::{PgRepository, Repository};
use convicare::log::CONFIG;
use convicare::{cli, log, prometheus, router, AppState, Args};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration Error: {}", err);
            std::process::exit(exitcode::CONFIG);
        }
    };

    log::init(config.log.clone());

    debug!(
        target: CONFIG,
        msg = "Configuration loaded",
        host = config.server.host,
        port = config.server.port,
        database = config.database.name,
        session_ttl = config.session.ttl,
        prometheus = config.prometheus_enabled(),
    );

    if config.prometheus_enabled() {
        if let Err(err) = prometheus::start(&config.server.host, config.prometheus.port) {
            error!(
                msg = "Could not start Prometheus exporter",
                error = err.to_string()
            );
            std::process::exit(exitcode::CONFIG);
        }
    }

    match cli::run(&args, &config).await {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            error!(msg = "Command failed", error = err.to_string());
            std::process::exit(exitcode::SOFTWARE);
        }
    }

    let pool = init(&config).await;

    let repository: Arc<dyn Repository> = Arc::new(PgRepository::new(pool.clone()));
    let sessions = SessionStore::new(&config.session);
    let state = match AppState::new(repository, sessions) {
        Ok(state) => state,
        Err(err) => {
            error!(msg = "Could not load page templates", error = err.to_string());
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    let app = router(state);

    let listener = connect::bind_with_retry(&config.server).await;

    let shutdown = Arc::new(Notify::new());
    let server = {
        let shutdown = shutdown.clone();
        axum::serve(listener, app).with_graceful_shutdown(async move { shutdown.notified().await })
    };
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        _ = sigint() => {
            info!(msg = "Received SIGINT");
        },
        _ = sigterm() => {
            info!(msg = "Received SIGTERM");
        },
        result = &mut server => {
            error!(msg = "Server stopped unexpectedly", result = ?result);
            std::process::exit(exitcode::SOFTWARE);
        },
    }

    info!(msg = "Shutting down ConviCare");

    // Stop accepting connections and let in-flight requests finish
    shutdown.notify_one();

    info!(msg = "Waiting for requests");

    if tokio::time::timeout(config.server.shutdown_timeout(), server)
        .await
        .is_err()
    {
        warn!(msg = "Terminated open connections");
    }

    // Open connections close when the last pool handle drops
    drop(pool);
}

///
/// Creates the connection pool and checks the database is reachable
///
async fn init(config: &AppConfig) -> Pool {
    match checked_pool(config).await {
        Ok(pool) => {
            info!(
                msg = "Database connected",
                database = config.database.name,
                host = config.database.host,
                port = config.database.port,
                pool_size = config.database.pool_size,
            );
            pool
        }
        Err(err) => {
            error!(msg = "Could not start ConviCare", error = err.to_string());
            std::process::exit(exitcode::UNAVAILABLE);
        }
    }
}

async fn checked_pool(config: &AppConfig) -> Result<Pool, Error> {
    let pool = connect::pool(&config.database).await?;
    {
        let _client = pool.get().await?;
    }
    Ok(pool)
}

async fn sigint() -> std::io::Result<()> {
    signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}

async fn sigterm() -> std::io::Result<()> {
    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}
