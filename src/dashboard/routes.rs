// src/dashboard/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Creates the dashboard router
///
/// # Routes
/// - `GET /api/summaries` - Project summaries
/// - `GET /`, `/dashboard`, `/dashboard/projects`, `/dashboard/project/:id` - Page view-models
/// - `GET /health` - Liveness
pub fn dashboard_routes() -> Router {
    Router::new()
        .route("/api/summaries", get(handlers::get_summaries))
        .route("/", get(handlers::login_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/dashboard/projects", get(handlers::projects_page))
        .route("/dashboard/project/:id", get(handlers::project_page))
        .route("/health", get(handlers::health))
}
