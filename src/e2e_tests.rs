//! End-to-end tests
//!
//! The full router is served on an ephemeral port and driven over HTTP with
//! `reqwest`. The identity provider and the model are in-test stand-ins.

use async_trait::async_trait;
use chrono::Duration;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::RwLock};

use crate::ai::{AiError, ModelClient, ModelRequest};
use crate::auth::identity::IdentityError;
use crate::auth::models::IdentityClaims;
use crate::auth::{IdentityProvider, SessionBridge, SessionSigner};
use crate::common::migrations::test_support::memory_pool;
use crate::common::{AppConfig, AppState};

/// Each token `good:<name>` signs in as `uid-<name>`
struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, IdentityError> {
        match id_token.strip_prefix("good:") {
            Some(name) => Ok(IdentityClaims {
                subject: format!("uid-{}", name),
                email: format!("{}@example.com", name),
                name: Some(name.to_string()),
                picture: None,
            }),
            None => Err(IdentityError::Rejected("bad signature".to_string())),
        }
    }
}

/// Canned replies per flow, or a failure for every call
struct StubModel {
    fail: bool,
}

#[async_trait]
impl ModelClient for StubModel {
    async fn generate(&self, request: ModelRequest) -> Result<String, AiError> {
        if self.fail {
            return Err(AiError::UpstreamFailure("model offline".to_string()));
        }
        let reply = match request.flow {
            "summarization" => json!({ "summary": "Getting started." }),
            "risk_prediction" => json!({ "level": "Medium", "details": "Depends on a vendor." }),
            "smart_task_breakdown" => json!({ "tasks": ["Plan", "Build", "Ship"] }),
            "extract_task_details" => {
                json!({ "title": "Email Ann", "description": "Email Ann", "dueDate": "2024-07-01" })
            }
            _ => json!({ "answer": "Alpha is over budget." }),
        };
        Ok(reply.to_string())
    }
}

struct TestApp {
    base: String,
    client: Client,
    db: SqlitePool,
}

impl TestApp {
    async fn spawn(model_fails: bool) -> Self {
        let db = memory_pool().await;
        let config = AppConfig::from_lookup(|_| None);
        let sessions = Arc::new(SessionBridge::new(
            Arc::new(StubIdentity),
            SessionSigner::new("e2e_secret", Duration::days(5)),
            false,
            db.clone(),
        ));
        let state = AppState {
            db: db.clone(),
            config,
            sessions,
            model: Arc::new(StubModel { fail: model_fails }),
        };
        let router = crate::app::build_router(Arc::new(RwLock::new(state)), &[]);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .no_proxy()
            .build()
            .unwrap();

        Self {
            base: format!("http://{}", addr),
            client,
            db,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Sign in and return the `Cookie` header value
    async fn sign_in(&self, name: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/session"))
            .json(&json!({ "idToken": format!("good:{}", name) }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&response)
    }
}

fn set_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

fn cookie_pair(response: &reqwest::Response) -> String {
    set_cookie(response)
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_cookie_is_issued() {
    let app = TestApp::spawn(false).await;

    let response = app
        .client
        .post(app.url("/api/auth/session"))
        .json(&json!({ "idToken": "good:ada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=432000"));
    assert!(cookie.contains("Path=/"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_session_request_errors() {
    let app = TestApp::spawn(false).await;

    let missing = app
        .client
        .post(app.url("/api/auth/session"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let rejected = app
        .client
        .post(app.url("/api/auth/session"))
        .json(&json!({ "idToken": "forged" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&rejected).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_delete_session_clears_cookie() {
    let app = TestApp::spawn(false).await;

    let response = app
        .client
        .delete(app.url("/api/auth/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_revoked_session_is_refused() {
    let app = TestApp::spawn(false).await;
    let cookie = app.sign_in("ada").await;

    let me = app
        .client
        .get(app.url("/api/me"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me: Value = me.json().await.unwrap();
    assert_eq!(me["id"], "uid-ada");
    assert_eq!(me["email"], "ada@example.com");

    let revoke = app
        .client
        .post(app.url("/api/auth/revoke"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(revoke.status(), StatusCode::OK);

    let again = app
        .client
        .get(app.url("/api/me"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Route Guard Tests
// ============================================================================

#[tokio::test]
async fn test_guard_redirects() {
    let app = TestApp::spawn(false).await;

    let anonymous = app.client.get(app.url("/dashboard")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&anonymous), "/");

    let tampered = app
        .client
        .get(app.url("/dashboard/projects"))
        .header(header::COOKIE, "session=eyJhbGciOiJIUzI1NiJ9.e30.forged")
        .send()
        .await
        .unwrap();
    assert_eq!(tampered.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&tampered), "/");
    assert!(set_cookie(&tampered).contains("Max-Age=0"));

    let cookie = app.sign_in("ada").await;
    let login = app
        .client
        .get(app.url("/"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&login), "/dashboard");

    let dashboard = app
        .client
        .get(app.url("/dashboard"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);
    let view: Value = dashboard.json().await.unwrap();
    assert_eq!(view["view"], "dashboard");
    assert_eq!(view["projectCount"], 1);
    assert_eq!(view["pendingCount"], 3);
}

#[tokio::test]
async fn test_unguarded_paths_pass_through() {
    let app = TestApp::spawn(false).await;

    let health = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let login = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let view: Value = login.json().await.unwrap();
    assert_eq!(view["view"], "login");

    // API routes answer 401 themselves instead of redirecting
    let api = app.client.get(app.url("/api/projects")).send().await.unwrap();
    assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Project Tests
// ============================================================================

#[tokio::test]
async fn test_create_project_scenario() {
    let app = TestApp::spawn(false).await;
    let short = json!({ "name": "Ab", "description": "short", "status": "In Progress" });

    let anonymous = app
        .client
        .post(app.url("/api/projects"))
        .json(&short)
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = app.sign_in("ada").await;

    let invalid = app
        .client
        .post(app.url("/api/projects"))
        .header(header::COOKIE, &cookie)
        .json(&short)
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body["error"], "Invalid input.");
    assert_eq!(body["issues"].as_array().unwrap().len(), 2);

    let created = app
        .client
        .post(app.url("/api/projects"))
        .header(header::COOKIE, &cookie)
        .json(&json!({
            "name": "Website Relaunch",
            "description": "Redesign the marketing site",
            "status": "In Progress"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let project: Value = created.json().await.unwrap();
    assert!(project["id"].as_str().unwrap().starts_with("P_"));
    assert_eq!(project["name"], "Website Relaunch");
    assert_eq!(project["description"], "Redesign the marketing site");
    assert_eq!(project["status"], "In Progress");
    assert_eq!(project["userId"], "uid-ada");
}

#[tokio::test]
async fn test_first_sign_in_seeds_welcome_project_once() {
    let app = TestApp::spawn(false).await;
    let cookie = app.sign_in("ada").await;
    app.sign_in("ada").await;

    let projects: Value = app
        .client
        .get(app.url("/api/projects"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "My First Project");
    assert_eq!(projects[0]["status"], "Not Started");

    let id = projects[0]["id"].as_str().unwrap();
    let tasks: Value = app
        .client
        .get(app.url(&format!("/api/projects/{}/tasks", id)))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 3);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_tasks_are_owner_only() {
    let app = TestApp::spawn(false).await;
    let ada = app.sign_in("ada").await;
    let bob = app.sign_in("bob").await;

    let created = app
        .client
        .post(app.url("/api/tasks"))
        .header(header::COOKIE, &ada)
        .json(&json!({ "text": "Private task", "dueDate": "2024-07-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let task: Value = created.json().await.unwrap();
    let path = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let stolen = app
        .client
        .patch(app.url(&path))
        .header(header::COOKIE, &bob)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(stolen.status(), StatusCode::NOT_FOUND);

    let toggled = app
        .client
        .patch(app.url(&path))
        .header(header::COOKIE, &ada)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(toggled.status(), StatusCode::OK);
    let toggled: Value = toggled.json().await.unwrap();
    assert_eq!(toggled["completed"], true);

    let deleted = app
        .client
        .delete(app.url(&path))
        .header(header::COOKIE, &ada)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
}

// ============================================================================
// Summaries and AI Tests
// ============================================================================

#[tokio::test]
async fn test_summaries_cover_projects_with_tasks() {
    let app = TestApp::spawn(false).await;

    let empty: Value = app
        .client
        .get(app.url("/api/summaries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty, json!([]));

    app.sign_in("ada").await;

    let summaries: Value = app
        .client
        .get(app.url("/api/summaries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        summaries,
        json!([{ "projectName": "My First Project", "summary": "Getting started." }])
    );
}

#[tokio::test]
async fn test_summaries_fail_with_500() {
    let app = TestApp::spawn(true).await;
    app.sign_in("ada").await;

    let response = app.client.get(app.url("/api/summaries")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch summaries");
}

#[tokio::test]
async fn test_ai_endpoints() {
    let app = TestApp::spawn(false).await;
    let cookie = app.sign_in("ada").await;

    let risk: Value = app
        .client
        .post(app.url("/api/ai/risk"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "title": "Integrate payments" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(risk["level"], "Medium");

    let empty: Value = app
        .client
        .post(app.url("/api/ai/summarize"))
        .header(header::COOKIE, &cookie)
        .json(&json!([]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["summary"], "This project has no tasks defined yet.");

    let blank = app
        .client
        .post(app.url("/api/ai/smart-tasks"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "prompt": " " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let anonymous = app
        .client
        .post(app.url("/api/ai/ask"))
        .json(&json!({ "question": "How is Alpha?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ai_upstream_failure_is_503() {
    let app = TestApp::spawn(true).await;
    let cookie = app.sign_in("ada").await;

    let response = app
        .client
        .post(app.url("/api/ai/ask"))
        .header(header::COOKIE, &cookie)
        .json(&json!({ "question": "How is Alpha?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
