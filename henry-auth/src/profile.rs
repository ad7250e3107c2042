//! Profile repository over the user directory.

use std::sync::Arc;

use henry_common::util::{is_valid_email, normalize_email};
use henry_common::{AuthLatencyConfig, Role};
use serde_json::Value;

use crate::directory::UserDirectory;
use crate::error::{AuthError, AuthResult};
use crate::record::{string_value, ProfileFields, UserRecord};

/// Get and merge profile fields by account id.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    directory: Arc<UserDirectory>,
    latency: AuthLatencyConfig,
}

impl ProfileRepository {
    pub fn new(directory: Arc<UserDirectory>, latency: AuthLatencyConfig) -> Self {
        Self { directory, latency }
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &str) -> Option<UserRecord> {
        self.latency.profile_read.simulate().await;
        self.directory.get(id).await
    }

    /// Shallow-merge `fields` into an existing record.
    ///
    /// Fails with [`AuthError::NotFound`] when no record has this id. Keys not
    /// named in `fields` keep their values.
    pub async fn merge(&self, id: &str, fields: ProfileFields) -> AuthResult<UserRecord> {
        self.latency.profile_write.simulate().await;
        let keys: Vec<String> = fields.keys().cloned().collect();
        let record = self
            .directory
            .update(id, |record| record.apply_patch(fields))
            .await?;
        tracing::debug!(user_id = %id, fields = ?keys, "Profile merged");
        Ok(record)
    }

    /// Merge into the record when it exists, otherwise create it.
    ///
    /// A created record needs an `email` field that is valid and not yet
    /// registered. It has no credential, so it cannot sign in until one is set.
    pub async fn upsert(&self, id: &str, mut fields: ProfileFields) -> AuthResult<UserRecord> {
        self.latency.profile_write.simulate().await;

        if self.directory.get(id).await.is_some() {
            let record = self
                .directory
                .update(id, |record| record.apply_patch(fields))
                .await?;
            tracing::debug!(user_id = %id, "Profile upsert merged into existing record");
            return Ok(record);
        }

        let email = match fields.remove("email") {
            Some(value) => normalize_email(&string_value("email", value)?),
            None => {
                return Err(AuthError::InvalidField {
                    field: "email".into(),
                    reason: "required to create a profile".into(),
                })
            }
        };
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail(email));
        }

        let display_name = fields
            .get("displayName")
            .or_else(|| fields.get("fullName"))
            .and_then(Value::as_str)
            .map_or_else(|| email.clone(), str::to_string);

        let mut record = UserRecord::new(id, email, display_name, Role::default(), None);
        record.apply_patch(fields)?;
        self.directory.insert(record.clone()).await?;

        tracing::info!(user_id = %id, email = %record.email, "Profile created by upsert");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::CredentialHasher;
    use crate::seed::SeedAccount;
    use serde_json::json;

    fn repo() -> ProfileRepository {
        let hasher = CredentialHasher::new(8, 1).unwrap();
        let directory = UserDirectory::with_accounts(
            &hasher,
            &[SeedAccount::new("u1", "a@x.com", "demo123")
                .display_name("Ana")
                .field("institution", "Universidad Nacional")],
        )
        .unwrap();
        ProfileRepository::new(Arc::new(directory), AuthLatencyConfig::none())
    }

    fn fields(value: Value) -> ProfileFields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_merge_reflects_new_field_and_keeps_others() {
        let repo = repo();
        repo.merge("u1", fields(json!({ "bio": "Hola" }))).await.unwrap();

        let record = repo.get("u1").await.unwrap();
        assert_eq!(record.field("bio"), Some(&json!("Hola")));
        assert_eq!(record.field("institution"), Some(&json!("Universidad Nacional")));
        assert_eq!(record.display_name, "Ana");
        assert_eq!(record.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_merge_is_strict() {
        let repo = repo();
        let err = repo
            .merge("ghost", fields(json!({ "email": "g@x.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
        assert!(repo.get("ghost").await.is_none());
        assert_eq!(repo.directory().len().await, 1);
    }

    #[tokio::test]
    async fn test_merge_rejects_identity_fields() {
        let repo = repo();
        let err = repo
            .merge("u1", fields(json!({ "email": "b@x.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ImmutableField(_)));
        assert_eq!(repo.get("u1").await.unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_upsert_creates_then_merges() {
        let repo = repo();
        let created = repo
            .upsert("u2", fields(json!({ "email": "B@x.com", "fullName": "Beto" })))
            .await
            .unwrap();
        assert_eq!(created.email, "b@x.com");
        assert_eq!(created.display_name, "Beto");
        assert!(!created.has_credential());

        repo.upsert("u2", fields(json!({ "bio": "Nuevo" }))).await.unwrap();
        let record = repo.get("u2").await.unwrap();
        assert_eq!(record.field("bio"), Some(&json!("Nuevo")));
        assert_eq!(record.field("fullName"), Some(&json!("Beto")));
    }

    #[tokio::test]
    async fn test_upsert_requires_unique_valid_email() {
        let repo = repo();
        assert!(matches!(
            repo.upsert("u2", fields(json!({ "bio": "x" }))).await,
            Err(AuthError::InvalidField { .. })
        ));
        assert!(matches!(
            repo.upsert("u2", fields(json!({ "email": "nope" }))).await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            repo.upsert("u2", fields(json!({ "email": "a@x.com" }))).await,
            Err(AuthError::AlreadyExists(_))
        ));
        assert_eq!(repo.directory().len().await, 1);
    }
}
