use crate::{
    auth::AuthUser,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    repo::TaskRepository,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Creates a new task for the authenticated user.
///
/// The owner is taken from the verified claims, never from the payload.
///
/// ## Responses:
/// - `201 Created`: `{success, message, task}`.
/// - `400 Bad Request`: validation failure, with the full list of
///   violated rules.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    repo: web::Data<TaskRepository>,
    task_data: web::Json<TaskInput>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task = repo.create(user.id(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Task created successfully",
        "task": task,
    })))
}

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `page` (optional): 1-indexed page number, defaults to 1.
/// - `limit` (optional): page size, defaults to 10.
/// - `status` (optional): `pending`, `in_progress`, `completed`, or
///   `cancelled`.
/// - `due_date` (optional): `overdue`, `today`, or `upcoming`.
/// - `search` (optional): case-insensitive substring match over title or
///   description.
///
/// ## Responses:
/// - `200 OK`: `{success, tasks, pagination: {page, limit, total,
///   total_pages}}`, newest first.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    repo: web::Data<TaskRepository>,
    query_params: web::Query<TaskQuery>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let page = repo.list(user.id(), &query_params).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "tasks": page.tasks,
        "pagination": page.pagination,
    })))
}

/// Fetches a single task by id.
///
/// ## Responses:
/// - `200 OK`: `{success, task}`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task under the caller's identity; identical
///   whether the id is absent or belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    repo: web::Data<TaskRepository>,
    task_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task = repo.get_by_id(user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "task": task,
    })))
}

/// Applies a partial update to a task.
///
/// Only fields present in the payload are written; `updated_at` is always
/// refreshed.
///
/// ## Responses:
/// - `200 OK`: `{success, message, task}` with the updated task.
/// - `400 Bad Request`: a supplied field violates its constraints.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: same semantics as `get_task`.
#[put("/{id}")]
pub async fn update_task(
    repo: web::Data<TaskRepository>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task = repo
        .update(user.id(), task_id.into_inner(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// Deletes a task and returns the deleted record.
///
/// ## Responses:
/// - `200 OK`: `{success, message, task}` with the deleted task.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: same semantics as `get_task`.
#[delete("/{id}")]
pub async fn delete_task(
    repo: web::Data<TaskRepository>,
    task_id: web::Path<Uuid>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let task = repo.delete(user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task deleted successfully",
        "task": task,
    })))
}
