use crate::error::Error;
use crate::web::extract::{AdminUser, MedicalUser};
use crate::web::AppState;
use axum::extract::{Path, State};
use axum::response::Html;

pub async fn summary(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    state.views.reports_summary(&identity)
}

pub async fn general(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    let report = state.reports.general_report().await?;
    state.views.general_report(&identity, &report)
}

pub async fn service(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(key): Path<String>,
) -> Result<Html<String>, Error> {
    let report = state.reports.service_report(&key).await?;
    state.views.service_report(&identity, &report)
}

pub async fn patients(
    State(state): State<AppState>,
    MedicalUser(identity): MedicalUser,
) -> Result<Html<String>, Error> {
    state.views.patients(&identity)
}
