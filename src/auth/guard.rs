//! Route guard policy
//!
//! Pure decision table mapping (path, session state) to what the request
//! pipeline should do. The axum side lives in `guard_middleware`.

/// Where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/";
/// Where authenticated users land
pub const APP_LANDING_PATH: &str = "/dashboard";

const PROTECTED_PREFIX: &str = "/dashboard";

/// Paths the guard never looks at
const UNGUARDED_PREFIXES: [&str; 5] = [
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
    "/health",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session cookie on the request
    Unauthenticated,
    /// Cookie present and verified
    Authenticated,
    /// Cookie present but failed verification
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    /// Redirect and expire the stale cookie
    RedirectToLoginAndClear,
    RedirectToApp,
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether the guard runs for this path at all
pub fn is_guarded(path: &str) -> bool {
    !UNGUARDED_PREFIXES
        .iter()
        .any(|prefix| has_segment_prefix(path, prefix))
}

pub fn is_protected(path: &str) -> bool {
    has_segment_prefix(path, PROTECTED_PREFIX)
}

pub fn is_login(path: &str) -> bool {
    path == LOGIN_PATH
}

pub fn decide(path: &str, state: SessionState) -> GuardDecision {
    match state {
        SessionState::Unauthenticated if is_protected(path) => GuardDecision::RedirectToLogin,
        SessionState::Invalid if is_protected(path) => GuardDecision::RedirectToLoginAndClear,
        SessionState::Authenticated if is_login(path) => GuardDecision::RedirectToApp,
        _ => GuardDecision::Allow,
    }
}
