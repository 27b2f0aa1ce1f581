use crate::error::{AuthError, Error, ValidationError};
use crate::log::AUTHENTICATION;
use crate::model::{Identity, NewUser, Role};
use crate::prometheus::{LOGINS_TOTAL, LOGIN_FAILURES_TOTAL, USERS_REGISTERED_TOTAL};
use crate::repository::Repository;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// bcrypt work factor for stored passwords
pub const DEFAULT_COST: u32 = 10;

///
/// A submitted registration, from the public form or the admin form.
///
#[derive(Clone, Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

///
/// Password hashing and verification over the user table.
///
/// Hashing runs on the blocking thread pool.
///
#[derive(Clone)]
pub struct CredentialStore {
    repository: Arc<dyn Repository>,
    cost: u32,
}

impl CredentialStore {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        CredentialStore::with_cost(repository, DEFAULT_COST)
    }

    pub fn with_cost(repository: Arc<dyn Repository>, cost: u32) -> Self {
        CredentialStore { repository, cost }
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, Error> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hash)
    }

    ///
    /// False on mismatch and on a stored hash bcrypt cannot parse.
    ///
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored_hash)).await {
            Ok(Ok(valid)) => valid,
            Ok(Err(err)) => {
                warn!(target: AUTHENTICATION, msg = "Stored password hash is invalid", error = err.to_string());
                false
            }
            Err(_) => false,
        }
    }

    ///
    /// Hashes the password and inserts the user.
    ///
    /// The email is checked with a read before the insert. Two concurrent registrations can both
    /// pass the check, the unique index on `usuarios.email` rejects the second insert.
    ///
    pub async fn register(&self, registration: &Registration) -> Result<i64, Error> {
        let email = registration.email.trim();

        if email.is_empty() {
            return Err(ValidationError::MissingField { name: "email" }.into());
        }
        if registration.password.is_empty() {
            return Err(ValidationError::MissingField { name: "password" }.into());
        }

        if self.repository.find_user_by_email(email).await?.is_some() {
            debug!(target: AUTHENTICATION, msg = "Email already registered", email);
            return Err(AuthError::DuplicateEmail {
                email: email.to_string(),
            }
            .into());
        }

        let password_hash = self.hash(&registration.password).await?;

        let user = NewUser {
            name: registration.name.trim().to_string(),
            email: email.to_string(),
            password_hash,
            role: registration.role.clone(),
        };

        let id = self.repository.insert_user(&user).await?;
        counter!(USERS_REGISTERED_TOTAL).increment(1);

        info!(target: AUTHENTICATION, msg = "User registered", id, role = %user.role);
        Ok(id)
    }

    ///
    /// Self-service registration from the public form.
    ///
    /// The administrator role is only granted while no user exists, so the first account can
    /// administer the clinic. Later administrators are created from the user management pages.
    ///
    pub async fn register_public(&self, registration: &Registration) -> Result<i64, Error> {
        if registration.role.is_admin() && !self.repository.list_users().await?.is_empty() {
            warn!(
                target: AUTHENTICATION,
                msg = "Public administrator registration refused",
                email = registration.email.trim()
            );
            return Err(AuthError::AdminRegistrationClosed.into());
        }
        self.register(registration).await
    }

    ///
    /// Returns the identity to store in the session.
    ///
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, Error> {
        let email = email.trim();

        let Some(user) = self.repository.find_user_by_email(email).await? else {
            counter!(LOGIN_FAILURES_TOTAL).increment(1);
            debug!(target: AUTHENTICATION, msg = "Unknown user", email);
            return Err(AuthError::UnknownUser.into());
        };

        if !self.verify(password, &user.password_hash).await {
            counter!(LOGIN_FAILURES_TOTAL).increment(1);
            debug!(target: AUTHENTICATION, msg = "Incorrect password", id = user.id);
            return Err(AuthError::WrongPassword.into());
        }

        counter!(LOGINS_TOTAL).increment(1);
        info!(target: AUTHENTICATION, msg = "User logged in", id = user.id, role = %user.role);
        Ok(user.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserUpdate;
    use crate::repository::MemoryRepository;

    // Lowest cost bcrypt accepts
    const TEST_COST: u32 = 4;

    fn store() -> (Arc<MemoryRepository>, CredentialStore) {
        let repository = Arc::new(MemoryRepository::new());
        let store = CredentialStore::with_cost(repository.clone(), TEST_COST);
        (repository, store)
    }

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            name: "Dra. Ruiz".to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn verify_never_errors() {
        let (_, store) = store();
        let hash = store.hash("s3cret").await.unwrap();

        assert!(store.verify("s3cret", &hash).await);
        assert!(!store.verify("wrong", &hash).await);
        assert!(!store.verify("s3cret", "not a bcrypt hash").await);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_insert() {
        let (repository, store) = store();
        store
            .register(&registration("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();

        let err = store
            .register(&registration("ruiz@clinic.co", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Auth(AuthError::DuplicateEmail { ref email }) if email == "ruiz@clinic.co"
        ));
        assert_eq!(repository.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn public_admin_registration_is_only_open_while_empty() {
        let (repository, store) = store();

        store
            .register_public(&registration("root@clinic.co", Role::Admin))
            .await
            .unwrap();

        let err = store
            .register_public(&registration("intruder@clinic.co", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::AdminRegistrationClosed)));

        store
            .register_public(&registration("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();
        store
            .register(&registration("second@clinic.co", Role::Admin))
            .await
            .unwrap();
        assert_eq!(repository.list_users().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let (repository, store) = store();
        let id = store
            .register(&registration("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();

        let user = repository.find_user(id).await.unwrap().unwrap();
        assert_ne!(user.password_hash, "s3cret");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn authenticate_distinguishes_failures() {
        let (_, store) = store();
        store
            .register(&registration("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();

        let err = store
            .authenticate("nobody@clinic.co", "s3cret")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::UnknownUser)));

        let err = store
            .authenticate("ruiz@clinic.co", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::WrongPassword)));
    }

    #[tokio::test]
    async fn identity_is_a_snapshot_of_the_row() {
        let (repository, store) = store();
        let id = store
            .register(&registration("ruiz@clinic.co", Role::Medico))
            .await
            .unwrap();

        let identity = store.authenticate("ruiz@clinic.co", "s3cret").await.unwrap();

        let update = UserUpdate {
            name: "Otra".to_string(),
            email: "ruiz@clinic.co".to_string(),
            role: Role::Admin,
        };
        repository.update_user(id, &update).await.unwrap();

        assert_eq!(identity.id, id);
        assert_eq!(identity.name, "Dra. Ruiz");
        assert_eq!(identity.role, Role::Medico);
    }

    #[tokio::test]
    async fn blank_email_is_a_validation_error() {
        let (_, store) = store();
        let err = store
            .register(&registration("  ", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField { name: "email" })
        ));
    }
}
