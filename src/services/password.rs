//! Password hashing
//!
//! Secure password hashing and verification using Argon2id with a random
//! salt per hash.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id with secure defaults.
///
/// Returns the hash in PHC string format (algorithm, parameters, salt and
/// hash in one string).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `true` if the password matches; an error means the stored hash
/// is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_phc_string() {
        let hash = hash_password("senha-secreta").expect("hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("senha-secreta").expect("hash should succeed");
        assert!(verify_password("senha-secreta", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("senha-secreta").expect("hash should succeed");
        assert!(!verify_password("outra-senha", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let h1 = hash_password("senha").expect("hash");
        let h2 = hash_password("senha").expect("hash");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_verify_invalid_hash_errors() {
        assert!(verify_password("senha", "not-a-hash").is_err());
    }
}
