use crate::{
    auth::{AuthService, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account. The response carries the sanitized user
/// record and never a password field; clients obtain a token by logging in.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = auth.register(register_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        message: "User registered successfully".to_string(),
        user,
    }))
}

/// Login user
///
/// Authenticates a user and returns a session token alongside the
/// sanitized user record.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (user, token) = auth.login(login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user,
        token,
    }))
}
