use super::AppState;
use crate::auth::{require_role, require_session};
use crate::error::Error;
use crate::log::ACCESS;
use crate::model::{Identity, Role};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;
use tracing::debug;

///
/// The identity behind the request cookie, if any.
///
pub struct CurrentUser(pub Option<Identity>);

/// Any logged in user
pub struct Authenticated(pub Identity);

pub struct AdminUser(pub Identity);

/// `medico` or `admin`
pub struct MedicalUser(pub Identity);

/// The identity behind the session cookie in `headers`
pub(super) fn identity(headers: &HeaderMap, state: &AppState) -> Option<Identity> {
    state
        .sessions
        .token_from_headers(headers)
        .and_then(|token| state.sessions.resolve(&token))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(identity(&parts.headers, state)))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = identity(&parts.headers, state);
        let identity = require_session(identity.as_ref()).inspect_err(|_| {
            debug!(target: ACCESS, msg = "Anonymous request", path = parts.uri.path());
        })?;
        Ok(Authenticated(identity.clone()))
    }
}

fn with_role(parts: &Parts, state: &AppState, role: Role) -> Result<Identity, Error> {
    let identity = identity(&parts.headers, state);
    let identity = require_role(identity.as_ref(), &role).inspect_err(|err| {
        debug!(target: ACCESS, msg = "Access denied", path = parts.uri.path(), error = %err);
    })?;
    Ok(identity.clone())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        with_role(parts, state, Role::Admin).map(AdminUser)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MedicalUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        with_role(parts, state, Role::Medico).map(MedicalUser)
    }
}
