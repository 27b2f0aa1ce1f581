use crate::error::Error;
use crate::log::AUTHENTICATION;
use crate::web::error::user_message;
use crate::web::extract::AdminUser;
use crate::web::forms::{self, FormData};
use crate::web::AppState;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::info;

pub async fn list(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    let users = state.reports.list_users().await?;
    state.views.users(&identity, &users)
}

pub async fn new_page(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    state.views.new_user(&identity, None)
}

pub async fn create(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    form: FormData,
) -> Result<Response, Error> {
    let result = match forms::registration(&form) {
        Ok(registration) => state.credentials.register(&registration).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/usuarios/usuario_registrado_exitosamente").into_response()),
        Err(err) if err.is_expected() => {
            Ok(state
                .views
                .new_user(&identity, Some(&user_message(&err)))?
                .into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn created_page(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    state.views.user_created(&identity)
}

pub async fn edit_page(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let user = state
        .repository
        .find_user(id)
        .await?
        .ok_or(Error::NotFound { entity: "User", id })?;
    state.views.edit_user(&identity, &user, None)
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(id): Path<i64>,
    form: FormData,
) -> Result<Response, Error> {
    let result = match forms::user_update(&form) {
        Ok(update) => state.repository.update_user(id, &update).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(true) => {
            info!(target: AUTHENTICATION, msg = "User updated", id, by = identity.id);
            Ok(Redirect::to("/usuarios/edicion_exitosa").into_response())
        }
        Ok(false) => Err(Error::NotFound { entity: "User", id }),
        Err(err) if err.is_expected() => {
            let user = state
                .repository
                .find_user(id)
                .await?
                .ok_or(Error::NotFound { entity: "User", id })?;
            Ok(state
                .views
                .edit_user(&identity, &user, Some(&user_message(&err)))?
                .into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn updated_page(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, Error> {
    state.views.user_updated(&identity)
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(id): Path<i64>,
) -> Result<Redirect, Error> {
    if state.repository.delete_user(id).await? {
        info!(target: AUTHENTICATION, msg = "User deleted", id, by = identity.id);
    }
    Ok(Redirect::to("/usuarios"))
}
