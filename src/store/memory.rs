//! In-memory `UserStore` used by the test suites and local development.

use super::UserStore;
use crate::error::AppError;
use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user, returning whether one was removed. Lets tests exercise
    /// the "valid token, subject since deleted" resolution path.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut users = self.users.lock().expect("user store lock poisoned");
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = lock(&self.users)?;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = lock(&self.users)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        // Uniqueness check and insert happen under a single lock acquisition,
        // mirroring the unique index a real store provides.
        let mut users = lock(&self.users)?;
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::Conflict("email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

fn lock(users: &Mutex<Vec<User>>) -> Result<std::sync::MutexGuard<'_, Vec<User>>, AppError> {
    users
        .lock()
        .map_err(|_| AppError::Internal("user store lock poisoned".into()))
}
