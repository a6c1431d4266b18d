//! Password hashing with Argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Prefix marking a password that can never match.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// A random marker that no password verifies against.
pub fn make_unusable_password() -> String {
    format!(
        "{}{}",
        UNUSABLE_PASSWORD_PREFIX,
        Uuid::new_v4().simple()
    )
}

pub fn is_usable(encoded: &str) -> bool {
    !encoded.is_empty() && !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Check a plaintext password against a stored hash.
///
/// Unusable and malformed hashes never match.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    if !is_usable(encoded) {
        return false;
    }
    match PasswordHash::new(encoded) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Masked description of a stored password for the change form.
pub fn password_summary(encoded: &str) -> String {
    if !is_usable(encoded) {
        return "No password set.".to_string();
    }
    match PasswordHash::new(encoded) {
        Ok(parsed) => format!("algorithm: {} hash: ********", parsed.algorithm),
        Err(_) => "Invalid password format or unknown hashing algorithm.".to_string(),
    }
}
