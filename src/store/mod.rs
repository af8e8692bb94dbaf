//! Persistence seam for user accounts.
//!
//! The account service and identity resolver receive a `UserStore` handle at
//! construction time; nothing in the crate reaches for an ambient global
//! connection. The Postgres implementation backs the real service, and the
//! in-memory implementation backs tests and local development.

pub mod memory;
pub mod postgres;

use crate::error::AppError;
use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage contract consumed by the auth core.
///
/// Implementations must enforce email uniqueness (case-insensitive) inside
/// the storage layer itself, not as a check-then-act in the application:
/// concurrent signups racing on the same address must leave exactly one row.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by email. Matching is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Looks up a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new user, failing with `AppError::Conflict` when the email
    /// is already taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;
}
