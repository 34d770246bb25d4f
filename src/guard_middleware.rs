// src/guard_middleware.rs
//! Applies the route guard to every page request before its handler runs

use axum::{
    extract::{Extension, Request},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::guard::{self, GuardDecision, SessionState, APP_LANDING_PATH, LOGIN_PATH};
use crate::auth::session::session_cookie_from_headers;
use crate::common::SharedState;

/// Route guard middleware
///
/// At most one cookie verification per request; the only side effect is
/// clearing a cookie that failed verification.
pub async fn route_guard_middleware(
    Extension(state_lock): Extension<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !guard::is_guarded(&path) {
        return next.run(request).await;
    }

    let sessions = state_lock.read().await.sessions.clone();

    let session_state = match session_cookie_from_headers(request.headers()) {
        None => SessionState::Unauthenticated,
        Some(cookie) => match sessions.verify_session(&cookie, true).await {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Invalid,
        },
    };

    let decision = guard::decide(&path, session_state);
    debug!(path = %path, state = ?session_state, decision = ?decision, "Route guard");

    match decision {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        GuardDecision::RedirectToApp => Redirect::temporary(APP_LANDING_PATH).into_response(),
        GuardDecision::RedirectToLoginAndClear => {
            let mut response = Redirect::temporary(LOGIN_PATH).into_response();
            if let Ok(clear) = sessions.delete_session() {
                response.headers_mut().append(SET_COOKIE, clear);
            }
            response
        }
    }
}
