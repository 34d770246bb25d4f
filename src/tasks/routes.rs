// src/tasks/routes.rs

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers;

/// Creates the tasks router
///
/// # Routes
/// - `GET /api/tasks` - Caller's tasks
/// - `POST /api/tasks` - Create a task
/// - `POST /api/tasks/batch` - Create several tasks
/// - `PATCH /api/tasks/:id` - Toggle completion
/// - `DELETE /api/tasks/:id` - Delete
pub fn tasks_routes() -> Router {
    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/batch", post(handlers::create_tasks_batch))
        .route(
            "/api/tasks/:id",
            patch(handlers::update_task).delete(handlers::delete_task),
        )
}
