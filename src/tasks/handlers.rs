// src/tasks/handlers.rs

use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use super::models::{BatchCreateTasksRequest, CreateTaskRequest, Task, UpdateTaskRequest};
use super::services::TasksService;
use crate::auth::models::SuccessResponse;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(t)| t).map_err(|e| {
        warn!(error = %e, "Malformed task body");
        ApiError::BadRequest(e.body_text())
    })
}

/// GET /api/tasks - Caller's tasks, newest first
pub async fn list_tasks(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let state = state_lock.read().await.clone();
    let tasks = TasksService::new(state.db);

    Ok(Json(tasks.list_tasks_for_user(&authed.id).await?))
}

/// POST /api/tasks - Create one task
///
/// # Request Body
/// ```json
/// { "text": "Draft launch email", "dueDate": "2024-07-01", "projectId": "P_K7NP3XY2" }
/// ```
pub async fn create_task(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body(payload)?;

    let state = state_lock.read().await.clone();
    let tasks = TasksService::new(state.db);

    let task = tasks.create_task(&authed.id, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// POST /api/tasks/batch - Create the tasks proposed by the smart breakdown flow
pub async fn create_tasks_batch(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<BatchCreateTasksRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body(payload)?;

    let state = state_lock.read().await.clone();
    let tasks = TasksService::new(state.db);

    let created = tasks.create_tasks_batch(&authed.id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/tasks/:id - Toggle completion
pub async fn update_task(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let request = body(payload)?;

    let state = state_lock.read().await.clone();
    let tasks = TasksService::new(state.db);

    Ok(Json(tasks.update_task(&authed.id, &task_id, request).await?))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(task_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let tasks = TasksService::new(state.db);

    tasks.delete_task(&authed.id, &task_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
