//! In-memory user directory.
//!
//! One `RwLock` guards the whole list; writers replace records wholesale, so
//! the last writer wins and no partial update is ever visible.

use tokio::sync::RwLock;

use crate::error::{AuthError, AuthResult};
use crate::password::CredentialHasher;
use crate::record::UserRecord;
use crate::seed::SeedAccount;
use henry_common::util::normalize_email;

/// Process-wide list of user records.
#[derive(Debug, Default)]
pub struct UserDirectory {
    records: RwLock<Vec<UserRecord>>,
}

impl UserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the given accounts.
    pub fn with_accounts(hasher: &CredentialHasher, accounts: &[SeedAccount]) -> AuthResult<Self> {
        let mut records: Vec<UserRecord> = Vec::with_capacity(accounts.len());
        for account in accounts {
            let record = account.to_record(hasher)?;
            if records
                .iter()
                .any(|r| r.id == record.id || r.email == record.email)
            {
                return Err(AuthError::AlreadyExists(record.email));
            }
            records.push(record);
        }
        tracing::debug!(accounts = records.len(), "Seeded user directory");
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Get a record by id.
    pub async fn get(&self, id: &str) -> Option<UserRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Get a record by email (normalized before comparing).
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = normalize_email(email);
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.email == email)
            .cloned()
    }

    /// Insert a new record. Fails if its id or email is already present.
    pub async fn insert(&self, record: UserRecord) -> AuthResult<()> {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .iter()
            .find(|r| r.id == record.id || r.email == record.email)
        {
            let taken = if existing.email == record.email {
                record.email
            } else {
                record.id
            };
            return Err(AuthError::AlreadyExists(taken));
        }
        records.push(record);
        Ok(())
    }

    /// Apply `f` to a copy of the record and store the copy if `f` succeeds.
    pub async fn update<F>(&self, id: &str, f: F) -> AuthResult<UserRecord>
    where
        F: FnOnce(&mut UserRecord) -> AuthResult<()>,
    {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AuthError::NotFound(id.to_string()))?;

        let mut next = slot.clone();
        f(&mut next)?;
        *slot = next.clone();
        Ok(next)
    }

    /// All records, in insertion order.
    pub async fn list(&self) -> Vec<UserRecord> {
        self.records.read().await.clone()
    }
}
