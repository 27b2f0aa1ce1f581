mod error;
mod extract;
mod forms;
mod handlers;
pub mod views;

use crate::auth::{CredentialStore, SessionStore};
use crate::error::Error;
use crate::lifecycle::VisitLifecycle;
use crate::log::HTTP;
use crate::prometheus::REQUEST_DURATION_SECONDS;
use crate::report::ReportBuilder;
use crate::repository::Repository;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use handlers::{auth, histories, intake, pharmacy, reports, users};
use metrics::histogram;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub use error::{user_message, ErrorPage};
pub use extract::{AdminUser, Authenticated, CurrentUser, MedicalUser};
pub use forms::FormData;
pub use views::Views;

///
/// Shared by every request handler.
///
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub sessions: SessionStore,
    pub credentials: CredentialStore,
    pub lifecycle: VisitLifecycle,
    pub reports: ReportBuilder,
    pub views: Views,
}

impl AppState {
    ///
    /// Fails only when a page template does not compile.
    ///
    pub fn new(repository: Arc<dyn Repository>, sessions: SessionStore) -> Result<Self, Error> {
        let credentials = CredentialStore::new(repository.clone());
        AppState::with_credentials(repository, sessions, credentials)
    }

    pub fn with_credentials(
        repository: Arc<dyn Repository>,
        sessions: SessionStore,
        credentials: CredentialStore,
    ) -> Result<Self, Error> {
        Ok(AppState {
            lifecycle: VisitLifecycle::new(repository.clone()),
            reports: ReportBuilder::new(repository.clone()),
            views: Views::new()?,
            repository,
            sessions,
            credentials,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::index))
        .route("/health", get(auth::health))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(auth::dashboard))
        .route("/usuarios", get(users::list))
        .route("/usuarios/nuevo", get(users::new_page).post(users::create))
        .route(
            "/usuarios/usuario_registrado_exitosamente",
            get(users::created_page),
        )
        .route(
            "/usuarios/editar/:id",
            get(users::edit_page).post(users::update),
        )
        .route("/usuarios/edicion_exitosa", get(users::updated_page))
        .route("/usuarios/eliminar/:id", post(users::delete))
        .route("/registro_clinico", get(intake::clinical_form))
        .route("/registro", post(intake::create_history))
        .route("/registro_clinico_simple", get(intake::intake_form))
        .route("/registro_simple", post(intake::create_intake))
        .route("/historias_simples", get(histories::basic_list))
        .route("/historias_simples/editar/:id", get(histories::basic_edit))
        .route("/historias_basicas/editar/:id", post(histories::promote))
        .route("/historias", get(histories::list))
        .route(
            "/historias_clinicas/editar/:id",
            get(histories::edit).post(histories::attend),
        )
        .route(
            "/historias_clinicas_atendidas/ver/:id",
            get(histories::attended_detail),
        )
        .route("/farmacia", get(pharmacy::list))
        .route("/farmacia/ver/:id", get(pharmacy::detail))
        .route("/resumen_reportes", get(reports::summary))
        .route("/reporte/general", get(reports::general))
        .route("/reporte/:servicio", get(reports::service))
        .route("/pacientes", get(reports::patients))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::render_errors,
        ))
        .with_state(state)
        .layer(middleware::from_fn(record_duration))
        .layer(TraceLayer::new_for_http())
}

async fn record_duration(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    histogram!(REQUEST_DURATION_SECONDS).record(duration);
    debug!(
        target: HTTP,
        msg = "Request handled",
        %method,
        path,
        status = response.status().as_u16(),
        duration_ms = duration.as_millis() as u64
    );

    response
}
