use super::views::DENIED;
use super::{extract, AppState};
use crate::error::{AuthError, Error, ValidationError};
use crate::log::HTTP;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::error;

///
/// Message shown to the user for an expected failure.
///
pub fn user_message(err: &Error) -> String {
    match err {
        Error::Auth(AuthError::DuplicateEmail { .. }) => {
            "⚠️ Este correo ya está registrado.".to_string()
        }
        Error::Auth(AuthError::AdminRegistrationClosed) => {
            "🚫 Solo un administrador puede crear cuentas de administrador.".to_string()
        }
        Error::Auth(AuthError::UnknownUser) => "⚠️ Usuario no encontrado.".to_string(),
        Error::Auth(AuthError::WrongPassword) => "❌ Contraseña incorrecta.".to_string(),
        Error::Auth(AuthError::Unauthenticated) => "⚠️ Debe iniciar sesión.".to_string(),
        Error::Auth(AuthError::Forbidden { .. }) => DENIED.to_string(),
        Error::Validation(ValidationError::MissingVisitDate) => {
            "⚠️ La fecha es obligatoria. Por favor, ingrésela antes de continuar.".to_string()
        }
        Error::Validation(ValidationError::MissingField { name }) => {
            format!("⚠️ El campo {name} es obligatorio.")
        }
        Error::Validation(ValidationError::InvalidDate { name, value }) => {
            format!("⚠️ La fecha {value} no es válida en el campo {name}.")
        }
        Error::Validation(ValidationError::InvalidNumber { name, value }) => {
            format!("⚠️ El valor {value} no es un número válido en el campo {name}.")
        }
        Error::NotFound { entity: "User", .. } => "⚠️ Usuario no encontrado.".to_string(),
        Error::NotFound {
            entity: "Pharmacy order",
            ..
        } => "⚠️ Receta no encontrada.".to_string(),
        Error::NotFound { .. } => "⚠️ Historia clínica no encontrada.".to_string(),
        _ => "Error en el servidor.".to_string(),
    }
}

///
/// A failure still to be rendered as a page.
///
/// Set on the response by `Error::into_response` and turned into HTML by `render_errors`,
/// which can see the session behind the request.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPage {
    pub title: &'static str,
    pub message: String,
    /// Offer a link back to the form
    pub back: bool,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, title, back) = match &self {
            Error::Auth(AuthError::Unauthenticated) => return Redirect::to("/login").into_response(),
            Error::Auth(AuthError::Forbidden { .. }) => (StatusCode::OK, "Acceso denegado", false),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "No encontrado", true),
            err if err.is_expected() => (StatusCode::OK, "Aviso", true),
            err => {
                error!(target: HTTP, msg = "Request failed", error = %err, source = ?err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error", false)
            }
        };

        let page = ErrorPage {
            title,
            message: user_message(&self),
            back,
        };
        let mut response = status.into_response();
        response.extensions_mut().insert(page);
        response
    }
}

///
/// Renders `ErrorPage` responses with the navigation of the logged in user.
///
pub async fn render_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let identity = extract::identity(request.headers(), &state);

    let mut response = next.run(request).await;
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    let status = response.status();
    match state
        .views
        .failure(page.title, identity.as_ref(), &page.message, page.back)
    {
        Ok(html) => (status, html).into_response(),
        Err(err) => {
            error!(target: HTTP, msg = "Error page could not be rendered", error = %err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error en el servidor.").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use axum::http::header;

    fn page(response: &Response) -> &ErrorPage {
        response.extensions().get::<ErrorPage>().unwrap()
    }

    #[test]
    fn anonymous_requests_redirect_to_login() {
        let response = Error::Auth(AuthError::Unauthenticated).into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(response.extensions().get::<ErrorPage>().is_none());
    }

    #[test]
    fn statuses_follow_the_failure_kind() {
        let forbidden = Error::Auth(AuthError::Forbidden {
            required: Role::Admin,
        })
        .into_response();
        assert_eq!(forbidden.status(), StatusCode::OK);
        assert_eq!(page(&forbidden).message, DENIED);

        let validation = Error::Validation(ValidationError::MissingVisitDate).into_response();
        assert_eq!(validation.status(), StatusCode::OK);
        assert!(page(&validation).back);

        let missing = Error::NotFound {
            entity: "Clinical history",
            id: 3,
        }
        .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let pool = Error::Pool(bb8::RunError::TimedOut).into_response();
        assert_eq!(pool.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(page(&pool).message, "Error en el servidor.");
    }

    #[test]
    fn messages_are_localized() {
        assert_eq!(
            user_message(&Error::Validation(ValidationError::MissingVisitDate)),
            "⚠️ La fecha es obligatoria. Por favor, ingrésela antes de continuar."
        );
        assert_eq!(
            user_message(&Error::NotFound {
                entity: "Pharmacy order",
                id: 1
            }),
            "⚠️ Receta no encontrada."
        );
    }
}
