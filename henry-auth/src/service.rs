//! Auth facade: sign-in, sign-up, sign-out and the session they drive.

use std::sync::Arc;

use chrono::Utc;
use henry_common::util::{char_len, is_valid_email, normalize_email};
use henry_common::{AuthConfig, Permission, Role};
use serde_json::Value;
use tokio::sync::watch;

use crate::directory::UserDirectory;
use crate::error::{AuthError, AuthResult};
use crate::password::CredentialHasher;
use crate::profile::ProfileRepository;
use crate::record::{string_value, Identity, ProfileFields, UserRecord, RESERVED_FIELDS};
use crate::seed::sample_accounts;
use crate::session::{SessionStore, Subscription};

/// Display name given to accounts that sign up without one.
pub const DEFAULT_DISPLAY_NAME: &str = "Nuevo Usuario";

/// Orchestrates the directory, session store and profile repository.
#[derive(Debug, Clone)]
pub struct AuthService {
    directory: Arc<UserDirectory>,
    session: SessionStore,
    profiles: ProfileRepository,
    hasher: CredentialHasher,
    config: AuthConfig,
}

impl AuthService {
    /// Build a service over an existing directory.
    pub fn new(directory: Arc<UserDirectory>, hasher: CredentialHasher, config: AuthConfig) -> Self {
        let profiles = ProfileRepository::new(Arc::clone(&directory), config.latency.clone());
        Self {
            directory,
            session: SessionStore::new(),
            profiles,
            hasher,
            config,
        }
    }

    /// Build a service from configuration, seeding the demo accounts when
    /// `seed_sample_accounts` is set.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        let hasher = CredentialHasher::from_config(config)?;
        let directory = if config.seed_sample_accounts {
            UserDirectory::with_accounts(&hasher, &sample_accounts())?
        } else {
            UserDirectory::new()
        };
        Ok(Self::new(Arc::new(directory), hasher, config.clone()))
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        &self.directory
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn profiles(&self) -> &ProfileRepository {
        &self.profiles
    }

    /// Sign in with email and secret.
    pub async fn sign_in(&self, email: &str, secret: &str) -> AuthResult<Identity> {
        self.config.latency.sign_in.simulate().await;
        let email = normalize_email(email);

        let record = self
            .directory
            .find_by_email(&email)
            .await
            .ok_or_else(|| AuthError::NotFound(email.clone()))?;

        let verified = match record.secret_hash.as_deref() {
            Some(hash) => self.hasher.verify(secret, hash)?,
            None => false,
        };
        if !verified {
            tracing::warn!(email = %email, "Sign-in rejected: invalid credential");
            return Err(AuthError::InvalidCredential);
        }
        if !record.enabled {
            tracing::warn!(email = %email, "Sign-in rejected: account disabled");
            return Err(AuthError::AccountDisabled(email));
        }

        let record = self
            .directory
            .update(&record.id, |r| {
                r.last_login_at = Some(Utc::now());
                Ok(())
            })
            .await?;

        let identity = record.identity();
        self.session.set(Some(identity.clone())).await;
        tracing::info!(user_id = %identity.id, email = %identity.email, role = %record.role, "User signed in");
        Ok(identity)
    }

    /// Create an account and sign it in.
    ///
    /// An already registered email is reported before anything in the form is
    /// validated.
    pub async fn sign_up(
        &self,
        email: &str,
        secret: &str,
        mut fields: ProfileFields,
    ) -> AuthResult<Identity> {
        self.config.latency.sign_up.simulate().await;
        let email = normalize_email(email);

        if self.directory.find_by_email(&email).await.is_some() {
            tracing::warn!(email = %email, "Sign-up rejected: email already registered");
            return Err(AuthError::AlreadyExists(email));
        }
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail(email));
        }
        if char_len(secret) < self.config.min_secret_len as u64 {
            return Err(AuthError::WeakSecret {
                min_len: self.config.min_secret_len,
            });
        }

        let role = match fields.remove("role") {
            Some(value) => {
                let tag = string_value("role", value)?;
                tag.parse::<Role>().map_err(|_| AuthError::InvalidRole(tag))?
            }
            None => Role::default(),
        };

        let display_name = [
            fields.remove("displayName"),
            fields.remove("display_name"),
        ]
        .into_iter()
        .flatten()
        .chain(fields.get("fullName").cloned())
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        for key in RESERVED_FIELDS.iter().chain(&["enabled"]) {
            fields.remove(*key);
        }

        let hash = self.hasher.hash(secret)?;
        let id = uuid::Uuid::new_v4().to_string();
        let mut record = UserRecord::new(id, email, display_name, role, Some(hash));
        record.profile = fields;
        record.last_login_at = Some(record.created_at);

        let identity = record.identity();
        self.directory.insert(record).await?;
        self.session.set(Some(identity.clone())).await;

        tracing::info!(user_id = %identity.id, email = %identity.email, role = %role, "User signed up");
        Ok(identity)
    }

    /// Clear the session. Signing out while signed out still notifies.
    pub async fn sign_out(&self) {
        self.config.latency.sign_out.simulate().await;
        let previous = self.session.current();
        self.session.set(None).await;
        tracing::info!(user_id = previous.as_ref().map(|i| i.id.as_str()), "User signed out");
    }

    /// Register a session listener. See [`SessionStore::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        self.session.subscribe(listener)
    }

    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.session.watch()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.session.current()
    }

    /// Full record of the signed-in user.
    pub async fn current_profile(&self) -> Option<UserRecord> {
        let identity = self.session.current()?;
        self.profiles.get(&identity.id).await
    }

    /// Rename the signed-in user and notify listeners with the new identity.
    ///
    /// The record is renamed either way, but if the session was cleared or
    /// switched while the write was pending the session is left alone and
    /// `NotSignedIn` is returned.
    pub async fn update_display_name(&self, name: &str) -> AuthResult<Identity> {
        let current = self.session.current().ok_or(AuthError::NotSignedIn)?;
        let mut fields = ProfileFields::new();
        fields.insert("displayName".into(), Value::from(name));

        let record = self.profiles.merge(&current.id, fields).await?;
        let identity = record.identity();
        if !self
            .session
            .replace_if_current(&current.id, identity.clone())
            .await
        {
            tracing::warn!(user_id = %current.id, "Session changed during rename; not restored");
            return Err(AuthError::NotSignedIn);
        }
        Ok(identity)
    }

    /// Replace the signed-in user's secret after checking the current one.
    pub async fn change_password(&self, current_secret: &str, new_secret: &str) -> AuthResult<()> {
        let current = self.session.current().ok_or(AuthError::NotSignedIn)?;
        self.config.latency.profile_write.simulate().await;

        let record = self
            .directory
            .get(&current.id)
            .await
            .ok_or_else(|| AuthError::NotFound(current.id.clone()))?;
        let verified = match record.secret_hash.as_deref() {
            Some(hash) => self.hasher.verify(current_secret, hash)?,
            None => false,
        };
        if !verified {
            return Err(AuthError::InvalidCredential);
        }
        if char_len(new_secret) < self.config.min_secret_len as u64 {
            return Err(AuthError::WeakSecret {
                min_len: self.config.min_secret_len,
            });
        }

        let hash = self.hasher.hash(new_secret)?;
        self.directory
            .update(&current.id, move |r| {
                r.secret_hash = Some(hash);
                r.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        tracing::info!(user_id = %current.id, "Password changed");
        Ok(())
    }

    /// Whether the account exists, is enabled, and its role grants `permission`.
    pub async fn has_permission(&self, user_id: &str, permission: Permission) -> bool {
        match self.directory.get(user_id).await {
            Some(record) if record.enabled => record.role.has_permission(permission),
            _ => false,
        }
    }
}
