pub mod account;
pub mod extractors;
pub mod guard;
pub mod identity;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Re-export the core surface.
pub use account::AccountService;
pub use extractors::AuthenticatedUser;
pub use identity::IdentityResolver;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenCodec, TokenError};

/// Represents the payload for a user login request.
///
/// No strength rules here: an account created under an older policy must
/// still be able to log in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new account signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    /// 8 to 128 characters with at least one uppercase letter, one lowercase
    /// letter, and one digit.
    #[validate(
        length(min = 8, max = 128, message = "password must be 8 to 128 characters"),
        custom = "validate_password_strength"
    )]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub display_name: String,
}

/// Response structure after successful authentication (login or signup).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed token for subsequent requests.
    pub token: String,
    /// The unique identifier of the authenticated user.
    pub user_id: Uuid,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let rule = if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("password must contain at least one digit")
    } else {
        None
    };

    match rule {
        Some(message) => {
            let mut err = ValidationError::new("password_strength");
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}
