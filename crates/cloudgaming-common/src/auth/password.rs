//! Credential store: password hashing and verification
//!
//! Digests are Argon2id PHC strings. Each digest carries its own salt and
//! cost parameters, so raising the configured cost never invalidates digests
//! produced under an older setting.

use std::fmt;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use cloudgaming_core::PasswordDigest;
use tracing::warn;

use crate::config::PasswordHashingConfig;
use crate::error::AppError;

/// Minimum password length accepted at registration (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted anywhere (in characters)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// Verified against when the account does not exist.
const DECOY_PASSWORD: &str = "decoy-credential-7f3a9c";

/// Hashes and verifies account passwords
///
/// Both operations are CPU-bound by construction. Async callers should run
/// them on a blocking thread (`tokio::task::spawn_blocking`).
#[derive(Clone)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
    params: PasswordHashingConfig,
    decoy: PasswordDigest,
}

impl CredentialStore {
    /// Create a store hashing with the given cost parameters
    ///
    /// # Errors
    /// Returns `AppError::Config` if Argon2 rejects the parameters.
    pub fn new(config: &PasswordHashingConfig) -> Result<Self, AppError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::Config(format!("Invalid Argon2 parameters: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy = hash_with(&argon2, DECOY_PASSWORD)?;

        Ok(Self {
            argon2,
            params: *config,
            decoy,
        })
    }

    /// Hash a plaintext password with a fresh random salt
    ///
    /// # Errors
    /// Returns `AppError::Validation` for empty or oversized input and
    /// `AppError::Internal` if the hasher itself fails.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, AppError> {
        check_length(plaintext)?;
        hash_with(&self.argon2, plaintext)
    }

    /// Check a plaintext password against a stored digest
    ///
    /// A digest that cannot be parsed never matches.
    #[must_use]
    pub fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        if plaintext.is_empty() || plaintext.chars().count() > MAX_PASSWORD_LENGTH {
            return false;
        }

        let parsed = match PasswordHash::new(digest.expose()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(password_hash::Error::Password) => false,
            Err(e) => {
                warn!(error = %e, "Password digest could not be verified");
                false
            }
        }
    }

    /// Spend the same work as a real verification against a throwaway digest
    ///
    /// Used on login for unknown emails so the response time does not reveal
    /// whether the account exists.
    pub fn verify_decoy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.decoy);
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> Result<PasswordDigest, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| PasswordDigest::new(hash.to_string()))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

fn check_length(plaintext: &str) -> Result<(), AppError> {
    if plaintext.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }

    if plaintext.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(())
}

/// Validate password composition for new accounts
///
/// Returns `Ok(())` if the password:
/// - is between 8 and 128 characters long
/// - contains at least one ASCII letter
/// - contains at least one digit
///
/// # Errors
/// Returns a validation error naming the first unmet rule
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_store() -> CredentialStore {
        CredentialStore::new(&PasswordHashingConfig::fast_for_tests()).unwrap()
    }

    #[test]
    fn test_hash_is_self_describing_argon2id() {
        let store = fast_store();
        let digest = store.hash("hunter2pass").unwrap();

        assert!(digest.expose().starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let store = fast_store();
        let first = store.hash("hunter2pass").unwrap();
        let second = store.hash("hunter2pass").unwrap();

        assert_ne!(first, second);
        assert!(store.verify("hunter2pass", &first));
        assert!(store.verify("hunter2pass", &second));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let store = fast_store();
        let digest = store.hash("hunter2pass").unwrap();

        assert!(!store.verify("hunter3pass", &digest));
        assert!(!store.verify("", &digest));
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        let store = fast_store();

        assert!(!store.verify("hunter2pass", &PasswordDigest::new("")));
        assert!(!store.verify("hunter2pass", &PasswordDigest::new("not-a-phc-string")));
        assert!(!store.verify("hunter2pass", &PasswordDigest::new("$argon2id$v=19$garbage")));
    }

    #[test]
    fn test_digest_from_other_cost_still_verifies() {
        let old = fast_store();
        let digest = old.hash("hunter2pass").unwrap();

        let upgraded = CredentialStore::new(&PasswordHashingConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        assert!(upgraded.verify("hunter2pass", &digest));
        assert!(upgraded
            .hash("hunter2pass")
            .unwrap()
            .expose()
            .contains("m=2048,t=2,p=1"));
    }

    #[test]
    fn test_hash_rejects_empty_and_oversized() {
        let store = fast_store();

        assert!(matches!(store.hash(""), Err(AppError::Validation(_))));
        let long = "a1".repeat(65);
        assert!(matches!(store.hash(&long), Err(AppError::Validation(_))));
        assert!(!store.verify(&long, &store.hash("hunter2pass").unwrap()));
    }

    #[test]
    fn test_invalid_params_are_config_errors() {
        let result = CredentialStore::new(&PasswordHashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_decoy_verification_completes() {
        let store = fast_store();
        store.verify_decoy("anything-at-all");
    }

    #[test]
    fn test_debug_does_not_leak_decoy() {
        let printed = format!("{:?}", fast_store());
        assert!(printed.contains("CredentialStore"));
        assert!(!printed.contains("argon2id"));
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("hunter2pass").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());

        // Too short
        assert!(validate_password_strength("abc1").is_err());
        // No digit
        assert!(validate_password_strength("abcdefgh").is_err());
        // No letter
        assert!(validate_password_strength("12345678").is_err());
        // Too long
        assert!(validate_password_strength(&"a1".repeat(65)).is_err());
    }
}
