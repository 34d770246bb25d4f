// src/app.rs
//! Router composition shared by `main` and the end-to-end tests

use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::common::SharedState;
use crate::guard_middleware::route_guard_middleware;
use crate::{ai, auth, dashboard, logging_middleware, profile, projects, tasks};

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true)
}

/// Every route plus the middleware stack. Layers added later wrap earlier
/// ones, so the state extension is in place before the guard runs.
pub fn build_router(shared: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES (session cookie, revocation)
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // PROFILE ROUTES
        // ====================================================================
        .merge(profile::profile_routes())
        // ====================================================================
        // PROJECT AND TASK ROUTES
        // ====================================================================
        .merge(projects::projects_routes())
        .merge(tasks::tasks_routes())
        // ====================================================================
        // AI ROUTES
        // ====================================================================
        .merge(ai::ai_routes())
        // ====================================================================
        // SUMMARIES, PAGE VIEW-MODELS, HEALTH
        // ====================================================================
        .merge(dashboard::dashboard_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(route_guard_middleware))
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}
