//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/session` - Exchange an identity token for the session cookie
/// - `DELETE /api/auth/session` - Clear the session cookie
/// - `POST /api/auth/revoke` - Revoke every session of the caller
pub fn auth_routes() -> Router {
    Router::new()
        .route(
            "/api/auth/session",
            post(handlers::create_session_handler).delete(handlers::delete_session_handler),
        )
        .route("/api/auth/revoke", post(handlers::revoke_sessions_handler))
}
