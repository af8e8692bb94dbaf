use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. Tasks reference their owner through `User::id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    /// Bcrypt hash. The plain password is never persisted or logged, and the
    /// hash never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account. The email must already be normalized and
/// the password already hashed by the account service.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}
