use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use super::identity::IdentityResolver;
use crate::error::AppError;
use crate::models::user::User;

/// Extracts the authenticated user for a request by running the identity
/// resolver on the `Authorization: Bearer` header.
///
/// This is the single authentication seam: any handler that takes an
/// `AuthenticatedUser` parameter is protected, and anything that fails
/// resolution is rejected with 401 before the handler body runs.
#[derive(Debug)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError converts via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolver = req.app_data::<web::Data<IdentityResolver>>().cloned();
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        Box::pin(async move {
            let resolver = resolver.ok_or_else(|| {
                AppError::Internal("identity resolver not configured".to_string())
            })?;
            let user = resolver.resolve(bearer.as_deref()).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}
