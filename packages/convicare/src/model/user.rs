use serde::{Deserialize, Serialize};
use std::fmt::Display;

///
/// Role of a registered user.
///
/// Stored as free text in `usuarios.rol`. `admin` and `medico` gate pages; anything else is
/// carried through unchanged as `Other`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Medico,
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Role {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "medico" | "médico" => Role::Medico,
            _ => Role::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Medico => "medico",
            Role::Other(other) => other,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_medico(&self) -> bool {
        matches!(self, Role::Medico)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

///
/// The authenticated identity carried by a session.
///
/// A copy taken at login, later changes to the user row do not affect it.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// Intake and physician signatures for a record created by this identity
    pub fn signatures(&self) -> (Option<String>, Option<String>) {
        if self.role.is_medico() {
            (None, Some(self.name.clone()))
        } else {
            (Some(self.name.clone()), None)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_normalizes_known_roles() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" ADMIN "), Role::Admin);
        assert_eq!(Role::parse("medico"), Role::Medico);
        assert_eq!(Role::parse("Médico"), Role::Medico);
        assert_eq!(
            Role::parse("enfermero"),
            Role::Other("enfermero".to_string())
        );
        assert_eq!(Role::parse("enfermero").as_str(), "enfermero");
    }

    #[test]
    fn signatures_follow_role() {
        let medico = Identity {
            id: 1,
            name: "Dra. Ruiz".to_string(),
            role: Role::Medico,
        };
        assert_eq!(medico.signatures(), (None, Some("Dra. Ruiz".to_string())));

        let nurse = Identity {
            id: 2,
            name: "Ana".to_string(),
            role: Role::Other("enfermero".to_string()),
        };
        assert_eq!(nurse.signatures(), (Some("Ana".to_string()), None));

        let admin = Identity {
            id: 3,
            name: "Root".to_string(),
            role: Role::Admin,
        };
        assert_eq!(admin.signatures(), (Some("Root".to_string()), None));
    }
}
