mod access;
mod credentials;
mod session;

pub use access::{authorize, require_role, require_session, Access};
pub use credentials::{CredentialStore, Registration, DEFAULT_COST};
pub use session::SessionStore;
