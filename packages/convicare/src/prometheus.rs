use crate::error::{ConfigError, Error};
use crate::log::DEVELOPMENT;
use metrics::{counter, describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{debug, info};

// See https://prometheus.io/docs/practices/naming/
pub const LOGINS_TOTAL: &str = "convicare_logins_total";
pub const LOGIN_FAILURES_TOTAL: &str = "convicare_login_failures_total";
pub const USERS_REGISTERED_TOTAL: &str = "convicare_users_registered_total";

pub const INTAKES_TOTAL: &str = "convicare_intakes_total";
pub const HISTORIES_CREATED_TOTAL: &str = "convicare_histories_created_total";
pub const HISTORIES_PROMOTED_TOTAL: &str = "convicare_histories_promoted_total";
pub const HISTORIES_ATTENDED_TOTAL: &str = "convicare_histories_attended_total";

pub const REQUEST_DURATION_SECONDS: &str = "convicare_request_duration_seconds";

pub fn start(host: &str, port: u16) -> Result<(), Error> {
    let address = format!("{host}:{port}");
    let socket_address: SocketAddr =
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                address: address.clone(),
            })?;

    debug!(target: DEVELOPMENT, msg = "Starting Prometheus exporter", port);

    PrometheusBuilder::new()
        .with_http_listener(socket_address)
        .install()?;

    describe_counter!(LOGINS_TOTAL, "Number of successful logins");
    describe_counter!(
        LOGIN_FAILURES_TOTAL,
        "Number of logins rejected for an unknown user or wrong password"
    );
    describe_counter!(USERS_REGISTERED_TOTAL, "Number of registered users");

    describe_counter!(INTAKES_TOTAL, "Number of basic intakes recorded");
    describe_counter!(
        HISTORIES_CREATED_TOTAL,
        "Number of full clinical histories recorded"
    );
    describe_counter!(
        HISTORIES_PROMOTED_TOTAL,
        "Number of basic intakes promoted to clinical histories"
    );
    describe_counter!(
        HISTORIES_ATTENDED_TOTAL,
        "Number of clinical histories attended"
    );

    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of HTTP request handling"
    );

    // Prometheus endpoint is empty on startup and looks like an error
    // Explicitly set count to zero
    counter!(LOGINS_TOTAL).absolute(0);

    info!(msg = "Prometheus exporter started", port);
    Ok(())
}
