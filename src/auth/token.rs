use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried inside an issued token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the id of the user this token authenticates.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Random unique token id. Carried for a future revocation hook; nothing
    /// consumes it today.
    pub jti: Uuid,
}

/// Failure modes of token verification.
///
/// Kept distinct so logs and tests can tell an expired token from a forged or
/// malformed one, but both collapse into `AppError::Unauthenticated` before
/// anything reaches a client.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    InvalidSignatureOrFormat,
}

/// Signs and verifies compact HS256 tokens with the server-wide secret.
///
/// The keys are derived once from the secret at startup and shared read-only
/// across requests. Tokens are stateless: rotating the secret invalidates
/// every outstanding token, which is the accepted tradeoff for having no
/// server-side token store.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token is invalid the second it expires.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a signed token for `subject`, expiring after `ttl`.
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verifies signature integrity first, then expiry, and returns the
    /// decoded claims.
    pub fn verify_and_decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignatureOrFormat,
            })
    }
}
