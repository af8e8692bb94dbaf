use crate::{
    auth::{AccountService, AuthResponse, LoginRequest, SignupRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new account
///
/// Creates the user and returns a ready-to-use authentication token, so no
/// separate login call is required after signup.
#[post("/signup")]
pub async fn signup(
    service: web::Data<AccountService>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = service.signup(signup_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

/// Login
///
/// Authenticates by email and password and returns a fresh token.
#[post("/login")]
pub async fn login(
    service: web::Data<AccountService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = service.login(login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}
