#![allow(dead_code)]

use chrono::NaiveDate;
use convicare::config::DatabaseConfig;
use convicare::connect;
use convicare::model::{HistoryRecord, IntakeRecord, Patient, Selection};
use convicare::repository::{PgRepository, SCHEMA};
use std::env;
use std::sync::Once;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;
use tracing_subscriber::{filter::Directive, EnvFilter, FmtSubscriber};

pub const PG_LATEST: u16 = 5532;

const TABLES: &str = "usuarios, consultas_basicas, historias_clinicas, \
     historias_clinicas_atendidas, farmacia";

static INIT: Once = Once::new();

/// Every test truncates the same tables
static DATABASE: Mutex<()> = Mutex::const_new(());

pub fn trace() {
    INIT.call_once(|| {
        let log_level: Directive = tracing::Level::DEBUG.into();

        let filter = EnvFilter::from_default_env().add_directive(log_level.to_owned());

        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

fn var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

///
/// The test database, `CV_DATABASE__*` variables override the defaults.
///
pub fn database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: var("CV_DATABASE__HOST", "localhost"),
        port: var("CV_DATABASE__PORT", &PG_LATEST.to_string())
            .parse()
            .expect("CV_DATABASE__PORT to be a port number"),
        name: var("CV_DATABASE__NAME", "convicare_test"),
        username: var("CV_DATABASE__USERNAME", "convicare"),
        password: var("CV_DATABASE__PASSWORD", "password"),
        pool_size: 2,
        connection_timeout: 2000,
    }
}

///
/// Exclusive use of an empty, migrated test database.
///
pub struct TestDatabase {
    pub repository: PgRepository,
    _lock: MutexGuard<'static, ()>,
}

///
/// Applies the schema and truncates every table.
///
/// Returns `None` when the database is not running, so the suite passes on machines without
/// PostgreSQL.
///
pub async fn database() -> Option<TestDatabase> {
    trace();
    let lock = DATABASE.lock().await;

    let config = database_config();
    let pool = connect::pool(&config).await.ok()?;

    {
        let client = match pool.get().await {
            Ok(client) => client,
            Err(err) => {
                warn!(msg = "Database unavailable, skipping", database = %config, error = err.to_string());
                return None;
            }
        };
        client.batch_execute(SCHEMA).await.unwrap();
        client
            .batch_execute(&format!("TRUNCATE {TABLES} RESTART IDENTITY"))
            .await
            .unwrap();
    }

    Some(TestDatabase {
        repository: PgRepository::new(pool),
        _lock: lock,
    })
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn patient(name: &str) -> Patient {
    Patient {
        identification_type: Some("CC".to_string()),
        name: name.to_string(),
        identification: "1001".to_string(),
        age: Some(34),
        ..Default::default()
    }
}

pub fn intake(name: &str) -> IntakeRecord {
    IntakeRecord {
        visit_date: date(2025, 3, 5),
        patient: patient(name),
        reason: Some("Dolor".to_string()),
    }
}

pub fn history(name: &str) -> HistoryRecord {
    HistoryRecord {
        visit_date: date(2025, 3, 5),
        patient: patient(name),
        reason: Some("Dolor".to_string()),
        background: None,
        vitals: Default::default(),
        obstetrics: Default::default(),
        physical_exam: None,
        services: Selection::from_stored(Some("Odontología")),
        attention: Selection::from_stored(Some("General")),
        intake_signer: Some("Ana".to_string()),
        physician_signer: None,
    }
}
