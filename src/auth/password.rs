use crate::error::AppError;
use bcrypt::hash;

/// Hashes a password with bcrypt at the given work factor.
///
/// The resulting string embeds the salt and cost, so verification needs no
/// side channel. Hashing is CPU-bound; callers on an async path should run it
/// on a blocking thread (see `AccountService`).
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

/// Verifies a password against a stored bcrypt hash.
///
/// Returns `false` for a malformed hash instead of erroring, so callers get a
/// uniform rejection path. The underlying comparison is constant-time.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    bcrypt::verify(password, hashed_password).unwrap_or(false)
}
