use crate::error::AuthError;
use crate::model::{Identity, Role};

///
/// What a route requires of the caller.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    Session,
    Role(Role),
}

///
/// Decides whether a request may proceed.
///
/// `Role(Medico)` admits admins as well, `Role(Admin)` admits only admins.
///
pub fn authorize(identity: Option<&Identity>, access: &Access) -> Result<(), AuthError> {
    match access {
        Access::Public => Ok(()),
        Access::Session => require_session(identity).map(|_| ()),
        Access::Role(role) => require_role(identity, role).map(|_| ()),
    }
}

pub fn require_session(identity: Option<&Identity>) -> Result<&Identity, AuthError> {
    identity.ok_or(AuthError::Unauthenticated)
}

pub fn require_role<'a>(
    identity: Option<&'a Identity>,
    required: &Role,
) -> Result<&'a Identity, AuthError> {
    let identity = require_session(identity)?;

    let allowed = match required {
        Role::Admin => identity.role.is_admin(),
        Role::Medico => identity.role.is_medico() || identity.role.is_admin(),
        Role::Other(_) => identity.role == *required || identity.role.is_admin(),
    };

    if allowed {
        Ok(identity)
    } else {
        Err(AuthError::Forbidden {
            required: required.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 1,
            name: "Ana".to_string(),
            role,
        }
    }

    #[test]
    fn anonymous_is_unauthenticated() {
        assert_eq!(authorize(None, &Access::Public), Ok(()));
        assert_eq!(
            authorize(None, &Access::Session),
            Err(AuthError::Unauthenticated)
        );
        assert_eq!(
            authorize(None, &Access::Role(Role::Medico)),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn admin_passes_every_role_check() {
        let admin = identity(Role::Admin);
        assert_eq!(authorize(Some(&admin), &Access::Role(Role::Admin)), Ok(()));
        assert_eq!(authorize(Some(&admin), &Access::Role(Role::Medico)), Ok(()));
    }

    #[test]
    fn medico_passes_only_medico() {
        let medico = identity(Role::Medico);
        assert_eq!(authorize(Some(&medico), &Access::Role(Role::Medico)), Ok(()));
        assert_eq!(
            authorize(Some(&medico), &Access::Role(Role::Admin)),
            Err(AuthError::Forbidden {
                required: Role::Admin
            })
        );
    }

    #[test]
    fn other_roles_pass_only_session() {
        let nurse = identity(Role::Other("enfermero".to_string()));
        assert_eq!(authorize(Some(&nurse), &Access::Session), Ok(()));
        assert!(authorize(Some(&nurse), &Access::Role(Role::Admin)).is_err());
        assert!(authorize(Some(&nurse), &Access::Role(Role::Medico)).is_err());
    }
}
