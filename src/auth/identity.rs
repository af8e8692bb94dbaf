use super::token::{TokenCodec, TokenError};
use crate::error::AppError;
use crate::models::user::User;
use crate::store::UserStore;
use log::debug;
use std::sync::Arc;

/// Resolves a bearer credential to a concrete user.
///
/// Per request the resolution walks: no token -> token present -> claims
/// valid -> resolved. Every failure along the way (missing token, bad
/// signature or format, expiry, or a structurally valid token whose subject
/// no longer exists) collapses into the same `AppError::Unauthenticated`, so
/// callers cannot probe for stale-but-well-formed tokens. The distinction is
/// kept only in debug logs.
pub struct IdentityResolver {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn UserStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    pub async fn resolve(&self, bearer: Option<&str>) -> Result<User, AppError> {
        let token = bearer.ok_or(AppError::Unauthenticated)?;

        let claims = self.codec.verify_and_decode(token).map_err(|e| {
            match e {
                TokenError::Expired => debug!("rejected expired token"),
                TokenError::InvalidSignatureOrFormat => {
                    debug!("rejected malformed or forged token")
                }
            }
            AppError::Unauthenticated
        })?;

        match self.store.find_by_id(claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                debug!("token subject {} no longer exists", claims.sub);
                Err(AppError::Unauthenticated)
            }
        }
    }
}
