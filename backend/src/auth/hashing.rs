//! Salted password hashing
//!
//! Hashes are a deterministic function of `(password, salt)`, so the
//! store keeps the salt next to the hash and verification simply
//! recomputes and compares.
//!
//! # Performance Considerations
//!
//! The Argon2 variant is intentionally CPU-intensive. Callers in async
//! contexts should run it through `spawn_blocking`.

use argon2::{
    password_hash::rand_core::{OsRng, RngCore},
    Argon2,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

/// Random bytes drawn for every new salt
pub const SALT_BYTES: usize = 32;

const ARGON2_OUTPUT_BYTES: usize = 32;
const ARGON2_MIN_SALT_BYTES: usize = 8;

/// Hashing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Hashing failed: {0}")]
    Failed(String),
}

/// Salted password hashing capability
pub trait HashingService: Send + Sync {
    /// Derive the hash for `password` under `salt`.
    fn generate_salted_hash(&self, password: &str, salt: &str) -> Result<String, HashingError>;

    /// Recompute the hash and compare it against `expected_hash` in
    /// constant time. Any hashing failure counts as a mismatch.
    fn verify(&self, password: &str, salt: &str, expected_hash: &str) -> bool {
        match self.generate_salted_hash(password, salt) {
            Ok(actual) => constant_time_eq(actual.as_bytes(), expected_hash.as_bytes()),
            Err(_) => false,
        }
    }
}

/// Generate a fresh random salt (hex-encoded)
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Single-pass SHA-256 over `salt || password`, hex-encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256HashingService;

impl HashingService for Sha256HashingService {
    fn generate_salted_hash(&self, password: &str, salt: &str) -> Result<String, HashingError> {
        if salt.is_empty() {
            return Err(HashingError::InvalidArgument("salt must not be empty"));
        }
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Argon2id raw hash keyed by the stored salt
///
/// Argon2 requires at least 8 bytes of salt; shorter salts are rejected.
#[derive(Clone, Default)]
pub struct Argon2HashingService {
    argon2: Argon2<'static>,
}

impl HashingService for Argon2HashingService {
    fn generate_salted_hash(&self, password: &str, salt: &str) -> Result<String, HashingError> {
        if salt.len() < ARGON2_MIN_SALT_BYTES {
            return Err(HashingError::InvalidArgument("salt must be at least 8 bytes"));
        }
        let mut output = [0u8; ARGON2_OUTPUT_BYTES];
        self.argon2
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut output)
            .map_err(|e| HashingError::Failed(e.to_string()))?;
        Ok(hex::encode(output))
    }
}

/// Configurable hashing algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashingAlgorithm {
    #[default]
    Sha256,
    Argon2,
}

impl HashingAlgorithm {
    /// Build the hashing service for this algorithm
    pub fn build(self) -> Arc<dyn HashingService> {
        match self {
            HashingAlgorithm::Sha256 => Arc::new(Sha256HashingService),
            HashingAlgorithm::Argon2 => Arc::new(Argon2HashingService::default()),
        }
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sha256_is_deterministic() {
        let service = Sha256HashingService;
        let first = service.generate_salted_hash("correct-pw", "s1").unwrap();
        let second = service.generate_salted_hash("correct-pw", "s1").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_sha256_known_vector() {
        // sha256("saltpassword")
        let hash = Sha256HashingService
            .generate_salted_hash("password", "salt")
            .unwrap();
        assert_eq!(
            hash,
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
        );
    }

    #[test]
    fn test_salt_changes_hash() {
        let service = Sha256HashingService;
        let a = service.generate_salted_hash("pw", "s1").unwrap();
        let b = service.generate_salted_hash("pw", "s2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_salt_rejected() {
        let err = Sha256HashingService
            .generate_salted_hash("pw", "")
            .unwrap_err();
        assert!(matches!(err, HashingError::InvalidArgument(_)));
        assert!(!Sha256HashingService.verify("pw", "", "anything"));
    }

    #[test]
    fn test_generate_salt_is_fresh() {
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(a, b);
        assert_eq!(a.len(), SALT_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let service = Argon2HashingService::default();
        let salt = generate_salt();
        let hash = service.generate_salted_hash("secure_password_123", &salt).unwrap();

        assert!(service.verify("secure_password_123", &salt, &hash));
        assert!(!service.verify("wrong_password", &salt, &hash));
    }

    #[test]
    fn test_argon2_rejects_short_salt() {
        let err = Argon2HashingService::default()
            .generate_salted_hash("pw", "s1")
            .unwrap_err();
        assert!(matches!(err, HashingError::InvalidArgument(_)));
    }

    #[test]
    fn test_algorithm_from_config_string() {
        let algo: HashingAlgorithm = serde_json::from_str("\"argon2\"").unwrap();
        assert_eq!(algo, HashingAlgorithm::Argon2);
        assert_eq!(HashingAlgorithm::default(), HashingAlgorithm::Sha256);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_hash_verifies_with_same_inputs(pw in ".{0,64}", salt in "[a-f0-9]{1,64}") {
            let service = Sha256HashingService;
            let hash = service.generate_salted_hash(&pw, &salt).unwrap();
            prop_assert!(service.verify(&pw, &salt, &hash));
        }

        #[test]
        fn prop_wrong_password_never_verifies(
            pw in ".{0,32}",
            wrong in ".{0,32}",
            salt in "[a-f0-9]{1,64}",
        ) {
            prop_assume!(pw != wrong);
            let service = Sha256HashingService;
            let hash = service.generate_salted_hash(&pw, &salt).unwrap();
            prop_assert!(!service.verify(&wrong, &salt, &hash));
        }
    }
}
