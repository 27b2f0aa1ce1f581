use crate::config::SessionConfig;
use crate::log::SESSION;
use crate::model::Identity;
use aws_lc_rs::hmac;
use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use uuid::Uuid;

const SIGNATURE_SEPARATOR: char = '.';

#[derive(Clone, Debug)]
struct Session {
    identity: Identity,
    expires_at: Instant,
}

impl Session {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

///
/// In-process session storage.
///
/// The cookie carries `<session id>.<hex hmac-sha256 of the id>`. A cookie with a bad signature,
/// an unknown id or an expired session resolves to no identity. Sessions are lost on restart.
///
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    key: hmac::Key,
    sessions: Mutex<HashMap<Uuid, Session>>,
    cookie_name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        SessionStore {
            inner: Arc::new(SessionInner {
                key: hmac::Key::new(hmac::HMAC_SHA256, config.secret.as_bytes()),
                sessions: Mutex::new(HashMap::new()),
                cookie_name: config.cookie_name.clone(),
                ttl: config.ttl(),
                secure: config.secure,
            }),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    ///
    /// Starts a session for `identity` and returns the signed token.
    /// Expired sessions are dropped first.
    ///
    pub fn create(&self, identity: Identity) -> String {
        let purged = self.purge_expired();
        if purged > 0 {
            trace!(target: SESSION, msg = "Purged expired sessions", purged);
        }

        let id = Uuid::new_v4();
        let session = Session {
            identity,
            expires_at: Instant::now() + self.inner.ttl,
        };

        debug!(target: SESSION, msg = "Session created", user = session.identity.id);
        self.lock().insert(id, session);

        self.sign(id)
    }

    pub fn resolve(&self, token: &str) -> Option<Identity> {
        let id = self.verify(token)?;
        let now = Instant::now();

        let mut sessions = self.lock();
        match sessions.get(&id) {
            Some(session) if session.is_expired(now) => {
                debug!(target: SESSION, msg = "Session expired", user = session.identity.id);
                sessions.remove(&id);
                None
            }
            Some(session) => Some(session.identity.clone()),
            None => {
                trace!(target: SESSION, msg = "Unknown session");
                None
            }
        }
    }

    /// Ends the session, unknown or badly signed tokens are ignored
    pub fn destroy(&self, token: &str) {
        if let Some(id) = self.verify(token) {
            if let Some(session) = self.lock().remove(&id) {
                debug!(target: SESSION, msg = "Session destroyed", user = session.identity.id);
            }
        }
    }

    /// Drops expired sessions, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds this store's cookie in the request `Cookie` headers
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.inner.cookie_name)
            .map(|(_, value)| value.to_string())
    }

    /// `Set-Cookie` value for a new session
    pub fn set_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.inner.cookie_name,
            self.inner.ttl.as_secs()
        );
        if self.inner.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.inner.cookie_name
        )
    }

    fn sign(&self, id: Uuid) -> String {
        let id = id.to_string();
        let tag = hmac::sign(&self.inner.key, id.as_bytes());
        format!("{id}{SIGNATURE_SEPARATOR}{}", hex::encode(tag.as_ref()))
    }

    fn verify(&self, token: &str) -> Option<Uuid> {
        let (id, signature) = token.split_once(SIGNATURE_SEPARATOR)?;
        let signature = hex::decode(signature).ok()?;

        if hmac::verify(&self.inner.key, id.as_bytes(), &signature).is_err() {
            debug!(target: SESSION, msg = "Session cookie signature is invalid");
            return None;
        }

        Uuid::parse_str(id).ok()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-session-secret-0123456789";

    fn identity() -> Identity {
        Identity {
            id: 4,
            name: "Dra. Ruiz".to_string(),
            role: Role::Medico,
        }
    }

    #[test]
    fn created_session_resolves_to_identity() {
        let store = SessionStore::new(&SessionConfig::with_secret(SECRET));
        let token = store.create(identity());

        assert_eq!(store.resolve(&token), Some(identity()));
    }

    #[test]
    fn tampered_token_is_anonymous() {
        let store = SessionStore::new(&SessionConfig::with_secret(SECRET));
        let token = store.create(identity());

        let (id, _) = token.split_once('.').unwrap();
        assert_eq!(store.resolve(&format!("{id}.00ff")), None);
        assert_eq!(store.resolve(id), None);
        assert_eq!(store.resolve(""), None);

        let other = SessionStore::new(&SessionConfig::with_secret("another-secret-0123456789"));
        assert_eq!(other.resolve(&token), None);
    }

    #[test]
    fn destroyed_session_is_anonymous() {
        let store = SessionStore::new(&SessionConfig::with_secret(SECRET));
        let token = store.create(identity());

        store.destroy(&token);
        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn expired_session_is_anonymous() {
        let mut config = SessionConfig::with_secret(SECRET);
        config.ttl = 0;
        let store = SessionStore::new(&config);

        let token = store.create(identity());
        let _ = store.create(identity());

        assert_eq!(store.resolve(&token), None);
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn token_is_read_from_cookie_header() {
        let store = SessionStore::new(&SessionConfig::with_secret(SECRET));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; convicare_session=abc.def; other=1"),
        );
        assert_eq!(store.token_from_headers(&headers), Some("abc.def".to_string()));

        assert_eq!(store.token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_attributes() {
        let mut config = SessionConfig::with_secret(SECRET);
        let store = SessionStore::new(&config);
        let cookie = store.set_cookie("abc.def");
        assert!(cookie.starts_with("convicare_session=abc.def;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        config.secure = true;
        let store = SessionStore::new(&config);
        assert!(store.set_cookie("abc.def").ends_with("; Secure"));
        assert!(store.clear_cookie().contains("Max-Age=0"));
    }
}
