//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. The variants form a small closed taxonomy: validation failures,
//! uniqueness conflicts, authentication and authorization denials, missing
//! resources, and internal/storage failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can
//! return it directly and have it rendered as an HTTP response with a JSON body.
//! Two properties are deliberate:
//!
//! - `Unauthenticated` and `Forbidden` are unit variants. Every path that
//!   produces them yields a byte-identical error, so clients cannot tell a
//!   wrong password from an unknown email, or a forged token from a token
//!   whose user has since been deleted.
//! - `Internal` and `Database` carry detail for server-side logs but render a
//!   fixed generic body; internals never leak to clients.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Input failed shape or strength validation (HTTP 400).
    /// The message enumerates the violated rule.
    ValidationFailed(String),
    /// A uniqueness constraint was violated, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Missing, invalid, or expired credentials (HTTP 401).
    /// Carries no detail: all authentication failures are indistinguishable.
    Unauthenticated,
    /// The caller is authenticated but does not own the resource (HTTP 403).
    Forbidden,
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// An error originating from the persistence layer (HTTP 500).
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthenticated => write!(f, "Unauthenticated: invalid credentials"),
            AppError::Forbidden => {
                write!(f, "Forbidden: caller does not own the requested resource")
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationFailed(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::Unauthenticated => HttpResponse::Unauthorized().json(json!({
                "error": "invalid credentials"
            })),
            AppError::Forbidden => HttpResponse::Forbidden().json(json!({
                "error": "you do not have access to this resource"
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            // Storage and internal errors are logged server-side and rendered
            // with a fixed body so no internals reach the client.
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, unique-constraint violations map to
/// `Conflict`, everything else becomes an opaque `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("resource already exists".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationFailed`,
/// preserving the per-rule messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationFailed(error.to_string())
    }
}
