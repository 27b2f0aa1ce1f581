use crate::model::Role;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    #[error("Password could not be hashed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Could not check out a database connection")]
    Pool(#[from] bb8::RunError<tokio_postgres::Error>),

    #[error("Background task failed")]
    Task(#[from] tokio::task::JoinError),

    #[error("Page could not be rendered")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value} for {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Invalid address {address}")]
    InvalidAddress { address: String },

    #[error("Missing field {name} from configuration file or environment")]
    MissingParameter { name: String },

    #[error("Session secret must be at least {min} bytes")]
    SessionSecretTooShort { min: usize },

    #[error(transparent)]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    FileOrEnvironment(#[from] config::ConfigError),
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Role {required} required")]
    Forbidden { required: Role },

    #[error("Only an administrator can create administrator accounts")]
    AdminRegistrationClosed,

    #[error("Email {email} is already registered")]
    DuplicateEmail { email: String },

    #[error("User not found")]
    UnknownUser,

    #[error("Incorrect password")]
    WrongPassword,
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Field {name} is required")]
    MissingField { name: &'static str },

    #[error("Visit date is required")]
    MissingVisitDate,

    #[error("Field {name} is not a valid date: {value}")]
    InvalidDate { name: &'static str, value: String },

    #[error("Field {name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.into())
    }
}

impl From<metrics_exporter_prometheus::BuildError> for Error {
    fn from(e: metrics_exporter_prometheus::BuildError) -> Self {
        Error::Config(e.into())
    }
}

impl Error {
    /// True for failures the user can correct by resubmitting a form.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Error::Auth(_) | Error::Validation(_) | Error::NotFound { .. }
        )
    }
}
