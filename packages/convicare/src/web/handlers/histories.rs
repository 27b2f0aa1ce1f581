use crate::error::Error;
use crate::web::error::user_message;
use crate::web::extract::{Authenticated, MedicalUser};
use crate::web::forms::{self, FormData};
use crate::web::AppState;
use axum::extract::{Path, State};
use axum::response::Html;

pub async fn basic_list(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Html<String>, Error> {
    let rows = state.reports.list_basic_intakes().await?;
    state.views.basic_list(&identity, &rows)
}

pub async fn basic_edit(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let consultation = state
        .repository
        .find_basic(id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Basic consultation",
            id,
        })?;
    state.views.basic_edit(&identity, &consultation, None)
}

pub async fn promote(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
    form: FormData,
) -> Result<Html<String>, Error> {
    let result = match forms::history(&form) {
        Ok(history) => state.lifecycle.promote(id, history, &identity).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => state.views.record_updated(&identity),
        Err(err @ Error::Validation(_)) => {
            let consultation = state
                .repository
                .find_basic(id)
                .await?
                .ok_or(Error::NotFound {
                    entity: "Basic consultation",
                    id,
                })?;
            state
                .views
                .basic_edit(&identity, &consultation, Some(&user_message(&err)))
        }
        Err(err) => Err(err),
    }
}

/// Pending and attended histories
pub async fn list(
    State(state): State<AppState>,
    MedicalUser(identity): MedicalUser,
) -> Result<Html<String>, Error> {
    let lists = state.reports.history_lists().await?;
    state.views.history_lists(&identity, &lists)
}

pub async fn edit(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let history = state
        .repository
        .find_history(id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Clinical history",
            id,
        })?;
    state.views.history_edit(&identity, &history, None)
}

///
/// Attends a pending history.
/// A missing visit date re-renders the edit form with the stored history and a message.
///
pub async fn attend(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
    form: FormData,
) -> Result<Html<String>, Error> {
    let result = match forms::attend(&form) {
        Ok(attend) => state.lifecycle.attend(id, attend, &identity).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => state.views.record_updated(&identity),
        Err(err @ Error::Validation(_)) => {
            let history = state
                .repository
                .find_history(id)
                .await?
                .ok_or(Error::NotFound {
                    entity: "Clinical history",
                    id,
                })?;
            state
                .views
                .history_edit(&identity, &history, Some(&user_message(&err)))
        }
        Err(err) => Err(err),
    }
}

pub async fn attended_detail(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let attended = state
        .repository
        .find_attended(id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Attended history",
            id,
        })?;
    state.views.attended_detail(&identity, &attended)
}
