//! Platform roles and the permissions each one grants.
//!
//! Three fixed roles exist:
//! - `teacher`: manages classes, builds presentations, generates content
//! - `student`: reads classes and talks to the tutor
//! - `admin`: full access, including user management and analytics
//!
//! The original Spanish tags (`profesor`, `estudiante`, `administrador`) are
//! accepted on input; serialization always uses the English tag.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Permissions that can be granted to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read own profile
    ProfileRead,
    /// Edit own profile
    ProfileWrite,
    /// View classes
    ClassRead,
    /// Create and edit classes
    ClassManage,
    /// Create and edit presentations
    PresentationWrite,
    /// Use the structured content generator
    ContentGenerate,
    /// Chat with the assistant
    AssistantChat,
    /// Manage other users
    UserAdmin,
    /// View platform analytics
    AnalyticsRead,
}

impl Permission {
    /// Get all available permissions.
    pub fn all() -> &'static [Permission] {
        &[
            Permission::ProfileRead,
            Permission::ProfileWrite,
            Permission::ClassRead,
            Permission::ClassManage,
            Permission::PresentationWrite,
            Permission::ContentGenerate,
            Permission::AssistantChat,
            Permission::UserAdmin,
            Permission::AnalyticsRead,
        ]
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "profesor")]
    Teacher,
    #[default]
    #[serde(alias = "estudiante")]
    Student,
    #[serde(alias = "administrador")]
    Admin,
}

impl Role {
    /// All roles, in dashboard order.
    pub fn all() -> &'static [Role] {
        &[Role::Teacher, Role::Student, Role::Admin]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }

    /// Parse a role tag, falling back to `Student` for anything unknown.
    pub fn parse_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Permissions granted by this role.
    pub fn permissions(self) -> HashSet<Permission> {
        match self {
            Self::Admin => Permission::all().iter().copied().collect(),
            Self::Teacher => [
                Permission::ProfileRead,
                Permission::ProfileWrite,
                Permission::ClassRead,
                Permission::ClassManage,
                Permission::PresentationWrite,
                Permission::ContentGenerate,
                Permission::AssistantChat,
            ]
            .into_iter()
            .collect(),
            Self::Student => [
                Permission::ProfileRead,
                Permission::ProfileWrite,
                Permission::ClassRead,
                Permission::AssistantChat,
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Check if this role has a specific permission.
    pub fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" | "profesor" => Ok(Self::Teacher),
            "student" | "estudiante" => Ok(Self::Student),
            "admin" | "administrador" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("teacher", Role::Teacher ; "english teacher")]
    #[test_case("profesor", Role::Teacher ; "spanish teacher")]
    #[test_case("Estudiante", Role::Student ; "spanish student mixed case")]
    #[test_case("admin", Role::Admin ; "english admin")]
    #[test_case("administrador", Role::Admin ; "spanish admin")]
    fn test_parse_role(tag: &str, expected: Role) {
        assert_eq!(tag.parse::<Role>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_role_defaults_to_student() {
        assert!("janitor".parse::<Role>().is_err());
        assert_eq!(Role::parse_or_default("janitor"), Role::Student);
        assert_eq!(Role::parse_or_default(""), Role::Student);
    }

    #[test]
    fn test_admin_has_all_permissions() {
        for permission in Permission::all() {
            assert!(
                Role::Admin.has_permission(*permission),
                "Admin should have {:?}",
                permission
            );
        }
    }

    #[test]
    fn test_student_cannot_manage() {
        assert!(Role::Student.has_permission(Permission::AssistantChat));
        assert!(!Role::Student.has_permission(Permission::ClassManage));
        assert!(!Role::Student.has_permission(Permission::ContentGenerate));
        assert!(!Role::Student.has_permission(Permission::UserAdmin));
    }

    #[test]
    fn test_teacher_generates_but_does_not_administer() {
        assert!(Role::Teacher.has_permission(Permission::ContentGenerate));
        assert!(Role::Teacher.has_permission(Permission::PresentationWrite));
        assert!(!Role::Teacher.has_permission(Permission::UserAdmin));
        assert!(!Role::Teacher.has_permission(Permission::AnalyticsRead));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let parsed: Role = serde_json::from_str("\"administrador\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_permission_serialization() {
        let json = serde_json::to_string(&Permission::ContentGenerate).unwrap();
        assert_eq!(json, "\"content_generate\"");
    }
}
