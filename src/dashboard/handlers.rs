// src/dashboard/handlers.rs

use axum::extract::{Extension, Json, Path};
use tracing::error;

use super::models::{
    DashboardView, HealthResponse, LoginView, ProjectView, ProjectsView, SummaryResponse,
};
use super::services::DashboardService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState};

/// GET /api/summaries - AI status summary per project with tasks
///
/// # Response
/// ```json
/// [{ "projectName": "Launch", "summary": "Design is done; the API is pending." }]
/// ```
pub async fn get_summaries(
    Extension(state_lock): Extension<SharedState>,
) -> Result<Json<Vec<SummaryResponse>>, ApiError> {
    let state = state_lock.read().await.clone();
    let dashboard = DashboardService::new(state.db);

    let summaries = dashboard
        .project_summaries(state.model.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Error fetching summaries");
            ApiError::InternalServer("Failed to fetch summaries".to_string())
        })?;
    Ok(Json(summaries))
}

/// GET / - Login view (signed-in users are redirected by the guard)
pub async fn login_page(Extension(state_lock): Extension<SharedState>) -> Json<LoginView> {
    let dev_mode = state_lock.read().await.config.dev_mode.is_enabled();
    Json(LoginView {
        view: "login",
        session_endpoint: "/api/auth/session",
        dev_mode,
    })
}

/// GET /dashboard
pub async fn dashboard_page(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Json<DashboardView> {
    let db = state_lock.read().await.db.clone();
    Json(DashboardService::new(db).overview(&authed).await)
}

/// GET /dashboard/projects
pub async fn projects_page(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Json<ProjectsView> {
    let db = state_lock.read().await.db.clone();
    Json(DashboardService::new(db).projects_view(&authed).await)
}

/// GET /dashboard/project/:id
pub async fn project_page(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectView>, ApiError> {
    let db = state_lock.read().await.db.clone();
    let view = DashboardService::new(db)
        .project_view(&authed, &project_id)
        .await?;
    Ok(Json(view))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
