//!
//! # Custom Error Handling
//!
//! Defines the `AppError` type used throughout the application. Every
//! component returns `Result<_, AppError>`; the `ResponseError` impl turns
//! each variant into the JSON envelope the API speaks
//! (`{"success": false, "message": ...}`), so handlers never build error
//! responses by hand.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` make the `?`
//! operator work at every layer. The sqlx conversion is where the
//! register-uniqueness race is resolved: a Postgres unique violation
//! becomes `DuplicateIdentity` rather than a generic database error.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All error conditions the application can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Client input violated field constraints (HTTP 400).
    /// Carries every violated rule, not just the first.
    Validation(Vec<String>),
    /// A user already exists with the given username or email (HTTP 400).
    /// Carries the offending field name.
    DuplicateIdentity(String),
    /// Login failed (HTTP 400). Deliberately undifferentiated: the response
    /// never reveals whether the email exists or the password was wrong.
    InvalidCredentials,
    /// No bearer token on a protected request (HTTP 401).
    MissingToken,
    /// Token failed signature verification or was malformed (HTTP 401).
    InvalidToken,
    /// Token is past its expiry (HTTP 401).
    ExpiredToken,
    /// The requested record does not exist under the caller's identity
    /// (HTTP 404). Identical whether the record is absent or owned by
    /// another user.
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500). Detail is suppressed
    /// outside debug builds.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join(", ")),
            AppError::DuplicateIdentity(field) => write!(f, "{} already exists", field),
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::MissingToken => write!(f, "Missing access token"),
            AppError::InvalidToken => write!(f, "Invalid access token"),
            AppError::ExpiredToken => write!(f, "Expired access token"),
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::Internal(detail) => write!(f, "Internal server error: {}", detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::DuplicateIdentity(_)
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::MissingToken | AppError::InvalidToken | AppError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            })),
            AppError::DuplicateIdentity(field) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": format!("{} already exists", field),
            })),
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Invalid email or password",
            })),
            // All token failures collapse to one message so a client cannot
            // distinguish a tampered token from an expired one.
            AppError::MissingToken | AppError::InvalidToken | AppError::ExpiredToken => {
                HttpResponse::Unauthorized().json(json!({
                    "success": false,
                    "message": "Access token required",
                }))
            }
            AppError::NotFound(what) => HttpResponse::NotFound().json(json!({
                "success": false,
                "message": format!("{} not found", what),
            })),
            AppError::Internal(detail) => {
                if cfg!(debug_assertions) {
                    HttpResponse::InternalServerError().json(json!({
                        "success": false,
                        "message": "Internal server error",
                        "error": detail,
                    }))
                } else {
                    HttpResponse::InternalServerError().json(json!({
                        "success": false,
                        "message": "Internal server error",
                    }))
                }
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-index violation (Postgres code 23505) becomes
/// `DuplicateIdentity`, named after the index that fired; everything else
/// is an internal error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                let field = match db_err.constraint() {
                    Some("users_username_key") => "username",
                    Some("users_email_key") => "email",
                    _ => "identity",
                };
                AppError::DuplicateIdentity(field.to_string())
            }
            _ => AppError::Internal(error.to_string()),
        }
    }
}

/// Flattens `validator::ValidationErrors` into the full list of violated
/// rules.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value ({})", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

/// Maps JWT processing failures onto the token error variants.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
            _ => AppError::InvalidToken,
        }
    }
}

/// Hashing failures are server-side faults, never the client's.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
