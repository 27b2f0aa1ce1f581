use crate::config::AppConfig;
use crate::connect;
use crate::error::Error;
use crate::log::MIGRATE;
use crate::repository::SCHEMA;
use tracing::info;

#[derive(clap::Args, Clone, Debug)]
#[command(version, about, long_about)]
///
/// Create the ConviCare tables
/// Existing tables are left untouched.
///
pub struct Migrate {
    /// Print the schema without applying it.
    #[arg(short, long, default_value_t = false)]
    pub dry_run: bool,
}

impl Migrate {
    pub async fn run(&self, config: &AppConfig) -> Result<(), Error> {
        if self.dry_run {
            info!(target: MIGRATE, msg = "Dry run, schema not applied");
            println!("{SCHEMA}");
            return Ok(());
        }

        let client = connect::database(&config.database).await?;
        client.batch_execute(SCHEMA).await?;

        info!(
            target: MIGRATE,
            msg = "Schema applied",
            database = config.database.name
        );
        Ok(())
    }
}
