//! Credential hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use henry_common::AuthConfig;

use crate::error::{AuthError, AuthResult};

/// Hashes and verifies account secrets.
///
/// Cost parameters only affect new hashes; verification reads them from the
/// stored PHC string, so hashes made under older settings keep working.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with explicit Argon2id costs.
    pub fn new(memory_kib: u32, iterations: u32) -> AuthResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AuthError::Credential(format!("Invalid hashing parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Create a hasher from the auth configuration.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        Self::new(config.hash_memory_kib, config.hash_iterations)
    }

    /// Hash a secret into a PHC string.
    pub fn hash(&self, secret: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::Credential(format!("Failed to hash secret: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a secret against a stored PHC string.
    pub fn verify(&self, secret: &str, hash: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::Credential(format!("Invalid stored hash: {}", e)))?;
        Ok(self
            .argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(8, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("demo123").unwrap();

        assert!(!hash.contains("demo123"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("demo123", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_same_secret_gets_different_salts() {
        let hasher = hasher();
        assert_ne!(hasher.hash("demo123").unwrap(), hasher.hash("demo123").unwrap());
    }

    #[test]
    fn test_verify_across_cost_settings() {
        let hash = CredentialHasher::new(16, 2).unwrap().hash("demo123").unwrap();
        assert!(hasher().verify("demo123", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let err = hasher().verify("demo123", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Credential(_)));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(CredentialHasher::new(8, 0).is_err());
    }
}
