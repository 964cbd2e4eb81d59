pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::{AuthMiddleware, TokenService};
use crate::error::AppError;

/// Builds the `/auth` and `/tasks` scopes.
///
/// The auth routes are public; the task routes sit behind
/// `AuthMiddleware`, so no task handler ever runs without verified
/// claims in the request extensions. Malformed JSON bodies and query
/// strings are shaped into the standard validation envelope here rather
/// than actix's default plain-text errors.
pub fn config(tokens: TokenService) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::Validation(vec![err.to_string()]).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::Validation(vec![err.to_string()]).into()
        }))
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware::new(tokens))
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Route not found",
    }))
}
