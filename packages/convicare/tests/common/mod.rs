#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use convicare::auth::{CredentialStore, Registration, SessionStore};
use convicare::config::SessionConfig;
use convicare::model::Role;
use convicare::repository::MemoryRepository;
use convicare::{router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &str = "test-session-secret-0123456789";
pub const PASSWORD: &str = "s3cret";

// Lowest cost bcrypt accepts
const TEST_COST: u32 = 4;

pub struct TestApp {
    pub repository: Arc<MemoryRepository>,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = Arc::new(MemoryRepository::new());
        let sessions = SessionStore::new(&SessionConfig::with_secret(SECRET));
        let credentials = CredentialStore::with_cost(repository.clone(), TEST_COST);
        let state =
            AppState::with_credentials(repository.clone(), sessions, credentials).unwrap();

        TestApp {
            repository,
            router: router(state.clone()),
            state,
        }
    }

    pub async fn user(&self, name: &str, email: &str, role: Role) -> i64 {
        self.state
            .credentials
            .register(&Registration {
                name: name.to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role,
            })
            .await
            .unwrap()
    }

    /// Registers a user and returns a `Cookie` header value for their session
    pub async fn login_as(&self, name: &str, email: &str, role: Role) -> String {
        self.user(name, email, role).await;

        let response = self
            .send(post(
                "/login",
                None,
                &format!("email={email}&password={PASSWORD}"),
            ))
            .await;

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(path: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::post(path).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}
