use crate::error::{AuthError, Error};
use crate::log::AUTHENTICATION;
use crate::web::error::user_message;
use crate::web::extract::{Authenticated, CurrentUser};
use crate::web::forms::{self, FormData};
use crate::web::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::debug;

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Html<String>, Error> {
    state.views.index(identity.as_ref())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, Error> {
    state.views.register(None)
}

pub async fn register(State(state): State<AppState>, form: FormData) -> Result<Html<String>, Error> {
    let result = match forms::registration(&form) {
        Ok(registration) => state.credentials.register_public(&registration).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => state.views.registration_success(),
        Err(err) if err.is_expected() => state.views.register(Some(&user_message(&err))),
        Err(err) => Err(err),
    }
}

pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, Error> {
    state.views.login(None)
}

pub async fn login(State(state): State<AppState>, form: FormData) -> Result<Response, Error> {
    let (email, password) = forms::login(&form);

    match state.credentials.authenticate(&email, &password).await {
        Ok(identity) => {
            let token = state.sessions.create(identity);
            let cookie = state.sessions.set_cookie(&token);
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        Err(err @ Error::Auth(AuthError::UnknownUser | AuthError::WrongPassword)) => {
            Ok(state.views.login(Some(&user_message(&err)))?.into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = state.sessions.token_from_headers(&headers) {
        state.sessions.destroy(&token);
    }
    debug!(target: AUTHENTICATION, msg = "Logged out");

    (
        [(header::SET_COOKIE, state.sessions.clear_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Html<String>, Error> {
    state.views.dashboard(&identity)
}
