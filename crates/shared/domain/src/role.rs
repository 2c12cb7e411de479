use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of account roles.
///
/// Role strings arriving from the outside are mapped through [`Role::from`];
/// anything unrecognized deliberately lands on the least-privileged
/// [`Role::Student`] instead of falling through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Faculty,
    Visitor,
    Admin,
}

impl Role {
    /// The wire/storage representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Visitor => "visitor",
            Self::Admin => "admin",
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "faculty" => Self::Faculty,
            "visitor" => Self::Visitor,
            _ => Self::Student,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_map_exactly() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("faculty"), Role::Faculty);
        assert_eq!(Role::from("visitor"), Role::Visitor);
        assert_eq!(Role::from("student"), Role::Student);
    }

    #[test]
    fn unknown_roles_default_to_student() {
        assert_eq!(Role::from(""), Role::Student);
        assert_eq!(Role::from("superuser"), Role::Student);
        // Matching is case-sensitive; "Admin" is not an elevation request.
        assert_eq!(Role::from("Admin"), Role::Student);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::Faculty.to_string(), "faculty");
    }
}
