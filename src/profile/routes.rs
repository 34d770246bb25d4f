// src/profile/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Creates the profile router
///
/// # Routes
/// - `GET /api/me` - Current user's profile
/// - `PUT /api/me` - Edit display name / avatar
pub fn profile_routes() -> Router {
    Router::new().route(
        "/api/me",
        get(handlers::me_handler).put(handlers::update_me_handler),
    )
}
