use super::password;
use super::token::TokenCodec;
use super::{LoginRequest, SignupRequest};
use crate::error::AppError;
use crate::models::user::{NewUser, User};
use crate::store::UserStore;
use chrono::Duration;
use log::debug;
use std::sync::Arc;
use validator::Validate;

/// Orchestrates signup and login on top of the credential hasher, the token
/// codec, and an injected user store.
///
/// Holds no mutable state; a single instance is shared across all requests.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
    token_ttl: Duration,
    bcrypt_cost: u32,
    /// Verified against when a login names an unknown email, so both login
    /// failure paths cost one bcrypt comparison and response timing cannot
    /// reveal whether an address is registered.
    dummy_hash: String,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn UserStore>,
        codec: TokenCodec,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        let dummy_hash =
            password::hash_password("unknown-account-placeholder", bcrypt_cost).unwrap_or_default();
        Self {
            store,
            codec,
            token_ttl,
            bcrypt_cost,
            dummy_hash,
        }
    }

    /// Creates an account and returns it together with a ready-to-use token,
    /// so no separate login is needed after signup.
    pub async fn signup(&self, request: SignupRequest) -> Result<(User, String), AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        // Friendly pre-check so obvious duplicates skip the hashing cost.
        // The storage-level unique constraint is what actually guarantees a
        // single winner when concurrent signups race on the same email.
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".into()));
        }

        let cost = self.bcrypt_cost;
        let plain = request.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let user = self
            .store
            .insert(NewUser {
                email,
                password_hash,
                display_name: request.display_name,
            })
            .await?;

        let token = self.codec.issue(user.id, self.token_ttl)?;
        debug!("user {} signed up", user.id);
        Ok((user, token))
    }

    /// Authenticates by email and password and issues a fresh token.
    ///
    /// An unknown email and a wrong password produce the identical error so
    /// callers cannot probe which addresses are registered.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Burn the same bcrypt work as a real verification.
                let plain = request.password;
                let dummy = self.dummy_hash.clone();
                let _ = tokio::task::spawn_blocking(move || {
                    password::verify_password(&plain, &dummy)
                })
                .await;
                return Err(AppError::Unauthenticated);
            }
        };

        let plain = request.password;
        let stored = user.password_hash.clone();
        let password_matches = tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?;

        if !password_matches {
            return Err(AppError::Unauthenticated);
        }

        let token = self.codec.issue(user.id, self.token_ttl)?;
        debug!("user {} logged in", user.id);
        Ok((user, token))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
