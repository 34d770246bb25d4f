// src/ai/routes.rs

use axum::{routing::post, Router};

use super::handlers;

/// Creates the AI router
///
/// # Routes
/// - `POST /api/ai/extract-task` - Structured task from free text
/// - `POST /api/ai/smart-tasks` - Goal breakdown
/// - `POST /api/ai/risk` - Risk prediction
/// - `POST /api/ai/summarize` - Task list summary
/// - `POST /api/ai/ask` - Project assistant
pub fn ai_routes() -> Router {
    Router::new()
        .route("/api/ai/extract-task", post(handlers::extract_task))
        .route("/api/ai/smart-tasks", post(handlers::smart_tasks))
        .route("/api/ai/risk", post(handlers::predict_risk))
        .route("/api/ai/summarize", post(handlers::summarize))
        .route("/api/ai/ask", post(handlers::ask))
}
