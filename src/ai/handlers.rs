// src/ai/handlers.rs

use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde::Deserialize;
use tracing::{info, warn};

use super::flows::{
    Answer, ExtractTaskDetails, ExtractedTask, ProjectQuestion, ProjectSummary, RiskAssessment,
    RiskInput, RiskPrediction, SmartTaskBreakdown, SmartTasks, Summarization, SummaryTask,
};
use super::pipeline::run_flow;
use crate::auth::AuthedUser;
use crate::common::{ApiError, SharedState};

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(t)| t).map_err(|e| {
        warn!(error = %e, "Malformed AI request body");
        ApiError::BadRequest(e.body_text())
    })
}

/// POST /api/ai/extract-task - Free text to `{title, description, dueDate?}`
pub async fn extract_task(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<ExtractedTask>, ApiError> {
    let request = body(payload)?;
    let model = state_lock.read().await.model.clone();

    info!(user_id = %authed.id, "Extracting task details");
    let task = run_flow::<ExtractTaskDetails>(model.as_ref(), request.prompt).await?;
    Ok(Json(task))
}

/// POST /api/ai/smart-tasks - Break a goal into tasks
pub async fn smart_tasks(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<SmartTasks>, ApiError> {
    let request = body(payload)?;
    let model = state_lock.read().await.model.clone();

    info!(user_id = %authed.id, "Generating smart tasks");
    let tasks = run_flow::<SmartTaskBreakdown>(model.as_ref(), request.prompt).await?;
    Ok(Json(tasks))
}

/// POST /api/ai/risk - Risk level for a task title
pub async fn predict_risk(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<RiskInput>, JsonRejection>,
) -> Result<Json<RiskAssessment>, ApiError> {
    let input = body(payload)?;
    let model = state_lock.read().await.model.clone();

    info!(user_id = %authed.id, "Predicting task risk");
    let risk = run_flow::<RiskPrediction>(model.as_ref(), input).await?;
    Ok(Json(risk))
}

/// POST /api/ai/summarize - Summarize `[{text, completed}]`
pub async fn summarize(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<Vec<SummaryTask>>, JsonRejection>,
) -> Result<Json<ProjectSummary>, ApiError> {
    let tasks = body(payload)?;
    let model = state_lock.read().await.model.clone();

    info!(user_id = %authed.id, count = tasks.len(), "Summarizing tasks");
    let summary = run_flow::<Summarization>(model.as_ref(), tasks).await?;
    Ok(Json(summary))
}

/// POST /api/ai/ask - Question answering over the project context
pub async fn ask(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let request = body(payload)?;
    let model = state_lock.read().await.model.clone();

    info!(user_id = %authed.id, "Answering project question");
    let answer = run_flow::<ProjectQuestion>(model.as_ref(), request.question).await?;
    Ok(Json(answer))
}
