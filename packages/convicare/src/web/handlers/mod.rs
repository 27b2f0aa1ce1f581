pub mod auth;
pub mod histories;
pub mod intake;
pub mod pharmacy;
pub mod reports;
pub mod users;
