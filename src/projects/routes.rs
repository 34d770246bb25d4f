// src/projects/routes.rs

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// Creates the projects router
///
/// # Routes
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects` - Caller's projects
/// - `GET /api/projects/:id` - One project
/// - `PATCH /api/projects/:id/status` - Change status
/// - `GET /api/projects/:id/tasks` - Tasks in a project
pub fn projects_routes() -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/api/projects/:id", get(handlers::get_project))
        .route(
            "/api/projects/:id/status",
            patch(handlers::update_project_status),
        )
        .route("/api/projects/:id/tasks", get(handlers::list_project_tasks))
}
