//! Password hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ApiError, Result};

/// Longest password prefix that is hashed; the rest is ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Cut `password` to at most 72 bytes without splitting a character.
fn truncate(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }
    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

/// Hash a password using Argon2 with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(truncate(password).as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// A stored value that is not a valid hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(truncate(password).as_bytes(), &parsed_hash)
        .is_ok()
}
