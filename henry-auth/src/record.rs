//! User records and the identity subset handed to callers.

use chrono::{DateTime, Utc};
use henry_common::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthError, AuthResult};

/// Free-form profile fields (institution, department, bio, ...).
pub type ProfileFields = serde_json::Map<String, Value>;

/// Keys that identify an account or carry credentials. A merge may not
/// touch them; sign-up drops them from the submitted form.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "uid",
    "email",
    "password",
    "secret",
    "createdAt",
    "updatedAt",
    "lastLoginAt",
];

/// The identity-bearing subset of a record: what sign-in returns and what
/// session subscribers receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// One platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique, stable id
    pub id: String,
    /// Unique, normalized email
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Disabled accounts cannot sign in
    pub enabled: bool,
    /// Argon2 PHC string; `None` for records created by upsert
    #[serde(skip)]
    pub(crate) secret_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Everything else the profile carries
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl UserRecord {
    pub(crate) fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        secret_hash: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            display_name: display_name.into(),
            role,
            enabled: true,
            secret_hash,
            created_at: now,
            updated_at: now,
            last_login_at: None,
            profile: ProfileFields::new(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }

    /// Whether this record can sign in at all.
    pub fn has_credential(&self) -> bool {
        self.secret_hash.is_some()
    }

    /// Look up a free-form profile field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }

    /// Shallow-merge `fields` into this record.
    ///
    /// `displayName`, `role` and `enabled` update the typed fields; reserved
    /// keys are rejected; everything else replaces the profile entry of the
    /// same name. Nothing is changed when an error is returned.
    pub(crate) fn apply_patch(&mut self, fields: ProfileFields) -> AuthResult<()> {
        let mut next = self.clone();

        for (key, value) in fields {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                return Err(AuthError::ImmutableField(key));
            }
            match key.as_str() {
                "displayName" | "display_name" => {
                    next.display_name = string_value(&key, value)?;
                }
                "role" => {
                    let tag = string_value(&key, value)?;
                    next.role = tag.parse().map_err(|_| AuthError::InvalidRole(tag))?;
                }
                "enabled" => {
                    next.enabled = value.as_bool().ok_or_else(|| AuthError::InvalidField {
                        field: key.clone(),
                        reason: "expected a boolean".into(),
                    })?;
                }
                _ => {
                    next.profile.insert(key, value);
                }
            }
        }

        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

/// Extract a string from a JSON value or report the field as invalid.
pub(crate) fn string_value(field: &str, value: Value) -> AuthResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(AuthError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}
