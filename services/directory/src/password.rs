//! Password hashing for stored profiles

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

use crate::error::{DirectoryError, DirectoryResult};

/// Hash a plaintext password into an Argon2 PHC string with a fresh salt
pub fn hash_password(password: &str) -> DirectoryResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DirectoryError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// Check a candidate password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> DirectoryResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        DirectoryError::PasswordHash(format!("Failed to parse password hash: {}", e))
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
