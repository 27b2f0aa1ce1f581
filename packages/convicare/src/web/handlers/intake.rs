use crate::error::Error;
use crate::web::error::user_message;
use crate::web::extract::{Authenticated, CurrentUser};
use crate::web::forms::{self, FormData};
use crate::web::AppState;
use axum::extract::State;
use axum::response::Html;

pub async fn clinical_form(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Html<String>, Error> {
    state.views.clinical_form(&identity, None)
}

/// Full clinical history, signed by the logged in user
pub async fn create_history(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    form: FormData,
) -> Result<Html<String>, Error> {
    let result = match forms::history(&form) {
        Ok(history) => state.lifecycle.create_full_history(history, &identity).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => state.views.record_saved(Some(&identity)),
        Err(err) if err.is_expected() => {
            state.views.clinical_form(&identity, Some(&user_message(&err)))
        }
        Err(err) => Err(err),
    }
}

pub async fn intake_form(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Html<String>, Error> {
    state.views.intake_form(identity.as_ref(), None)
}

pub async fn create_intake(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    form: FormData,
) -> Result<Html<String>, Error> {
    let result = match forms::intake(&form) {
        Ok(intake) => state.lifecycle.create_basic_intake(intake).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => state.views.record_saved(identity.as_ref()),
        Err(err) if err.is_expected() => state
            .views
            .intake_form(identity.as_ref(), Some(&user_message(&err))),
        Err(err) => Err(err),
    }
}
