// src/projects/handlers.rs

use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use super::models::{CreateProjectRequest, Project, UpdateProjectStatusRequest};
use super::services::ProjectsService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState};
use crate::tasks::{Task, TasksService};

// ============================================================================
// Project Handlers
// ============================================================================

/// POST /api/projects - Create a project for the caller
///
/// # Request Body
/// ```json
/// { "name": "Launch", "description": "Ship the beta to early users", "status": "In Progress" }
/// ```
///
/// 401 without a valid session, 400 with every validation issue, 201 with the stored project.
pub async fn create_project(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed project body");
        ApiError::BadRequest(e.body_text())
    })?;

    let state = state_lock.read().await.clone();
    let projects = ProjectsService::new(state.db);

    let project = projects.create_project(&authed.id, request).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects - Caller's projects, newest first
pub async fn list_projects(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let state = state_lock.read().await.clone();
    let projects = ProjectsService::new(state.db);

    Ok(Json(projects.list_projects_for_user(&authed.id).await?))
}

/// GET /api/projects/:id - One project the caller owns
pub async fn get_project(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let state = state_lock.read().await.clone();
    let projects = ProjectsService::new(state.db);

    Ok(Json(projects.get_owned_project(&authed.id, &project_id).await?))
}

/// PATCH /api/projects/:id/status - Change project status
pub async fn update_project_status(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
    payload: Result<Json<UpdateProjectStatusRequest>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let state = state_lock.read().await.clone();
    let projects = ProjectsService::new(state.db);

    let project = projects
        .update_status(&authed.id, &project_id, request)
        .await?;

    Ok(Json(project))
}

/// GET /api/projects/:id/tasks - Tasks of a project the caller owns, oldest first
pub async fn list_project_tasks(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let state = state_lock.read().await.clone();
    let projects = ProjectsService::new(state.db.clone());
    let tasks = TasksService::new(state.db);

    projects.get_owned_project(&authed.id, &project_id).await?;

    Ok(Json(tasks.list_tasks_for_project(&project_id).await?))
}
