// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use serde_json::Value;
use tracing::{debug, Level};

/// Bodies larger than this are passed through unlogged
const MAX_LOGGED_BODY: usize = 1024 * 1024;

/// JSON keys whose values never reach the logs
const REDACTED_KEYS: [&str; 2] = ["idToken", "id_token"];

/// Replace credential values anywhere in a JSON document
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if REDACTED_KEYS.contains(&key.as_str()) {
                    *v = Value::String("[REDACTED]".to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

fn printable(bytes: &[u8]) -> Option<String> {
    let body_str = std::str::from_utf8(bytes).ok()?;
    match serde_json::from_str::<Value>(body_str) {
        Ok(mut json) => {
            redact(&mut json);
            Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string()))
        }
        // Non-JSON bodies may carry anything; only their size is logged
        Err(_) => Some(format!("<{} bytes>", bytes.len())),
    }
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    if !bytes.is_empty() {
        if let Some(body_str) = printable(&bytes) {
            debug!(
                method = %parts.method,
                uri = %parts.uri,
                request_body = %body_str,
                "📥 Request"
            );
        }
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Some(body_str) = printable(&bytes) {
            debug!(
                status = %parts.status,
                response_body = %body_str,
                "📤 Response"
            );
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
