use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt silently ignores input past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes a password with bcrypt at the library's default cost.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// Returns an error only when `hashed_password` is not a valid bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
