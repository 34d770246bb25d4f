//! The five flows built on [`run_flow`](super::pipeline::run_flow)

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::pipeline::{AiError, AiFlow};
use crate::tasks::validators::is_valid_due_date;

fn require_text(field: &str, value: &str) -> Result<(), AiError> {
    if value.trim().is_empty() {
        return Err(AiError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

// ============================================================================
// Task-detail extraction
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTask {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

pub struct ExtractTaskDetails;

impl ExtractTaskDetails {
    /// Prompt with an explicit "today", so relative dates resolve against it
    pub fn prompt_for(text: &str, today: NaiveDate) -> String {
        format!(
            "You are an expert at parsing natural language and extracting structured data. \
A user will provide a prompt for a task. Your job is to extract the title, description, and due date.\n\n\
Current Date: {}\n\n\
Prompt: {}\n\n\
Extract the structured data from the prompt. For the due date, interpret relative dates like \
\"next Tuesday\" based on the current date. Write the due date as YYYY-MM-DD and omit it when no \
date is mentioned. If no description is given, repeat the title.",
            today.format("%Y-%m-%d"),
            text
        )
    }
}

impl AiFlow for ExtractTaskDetails {
    const NAME: &'static str = "extract_task_details";

    type Input = String;
    type Output = ExtractedTask;

    fn validate_input(input: &String) -> Result<(), AiError> {
        require_text("prompt", input)
    }

    fn render_prompt(input: &String) -> String {
        Self::prompt_for(input, Utc::now().date_naive())
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "The concise title of the task." },
                "description": { "type": "string", "description": "A more detailed description of the task." },
                "dueDate": { "type": "string", "description": "The due date in YYYY-MM-DD format." }
            },
            "required": ["title", "description"],
            "additionalProperties": false
        })
    }

    fn validate_output(output: &ExtractedTask) -> Result<(), AiError> {
        if output.title.trim().is_empty() {
            return Err(AiError::SchemaMismatch("title is empty".to_string()));
        }
        match output.due_date.as_deref() {
            Some(date) if !is_valid_due_date(date) => Err(AiError::SchemaMismatch(format!(
                "dueDate '{}' is not YYYY-MM-DD",
                date
            ))),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Smart task breakdown
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartTasks {
    pub tasks: Vec<String>,
}

pub struct SmartTaskBreakdown;

impl AiFlow for SmartTaskBreakdown {
    const NAME: &'static str = "smart_task_breakdown";

    type Input = String;
    type Output = SmartTasks;

    fn validate_input(input: &String) -> Result<(), AiError> {
        require_text("prompt", input)
    }

    fn render_prompt(input: &String) -> String {
        format!(
            "You are an expert project manager. A user will provide a high-level goal. Your job is \
to break it down into a list of smaller, actionable tasks.\n\n\
Goal: {}\n\n\
Generate a list of tasks to achieve this goal.",
            input
        )
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tasks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "The list of generated task descriptions."
                }
            },
            "required": ["tasks"],
            "additionalProperties": false
        })
    }

    fn validate_output(output: &SmartTasks) -> Result<(), AiError> {
        if output.tasks.iter().any(|t| t.trim().is_empty()) {
            return Err(AiError::SchemaMismatch("empty task in breakdown".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Risk prediction
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RiskInput {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub details: String,
}

pub struct RiskPrediction;

impl AiFlow for RiskPrediction {
    const NAME: &'static str = "risk_prediction";

    type Input = RiskInput;
    type Output = RiskAssessment;

    fn validate_input(input: &RiskInput) -> Result<(), AiError> {
        require_text("title", &input.title)
    }

    fn render_prompt(input: &RiskInput) -> String {
        format!(
            "You are an expert project manager. A user will provide a task title. Your job is to \
analyze the task and predict its potential risk.\n\n\
Task Title: {}\n\n\
Predict the risk level (Low, Medium, High) and provide a brief explanation.",
            input.title
        )
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "level": { "type": "string", "enum": ["Low", "Medium", "High"] },
                "details": { "type": "string", "description": "A brief explanation of the risk." }
            },
            "required": ["level", "details"],
            "additionalProperties": false
        })
    }
}

// ============================================================================
// Summarization
// ============================================================================

pub const NO_TASKS_SUMMARY: &str = "This project has no tasks defined yet.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTask {
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub summary: String,
}

pub struct Summarization;

impl AiFlow for Summarization {
    const NAME: &'static str = "summarization";

    type Input = Vec<SummaryTask>;
    type Output = ProjectSummary;

    fn short_circuit(input: &Vec<SummaryTask>) -> Option<ProjectSummary> {
        input.is_empty().then(|| ProjectSummary {
            summary: NO_TASKS_SUMMARY.to_string(),
        })
    }

    fn render_prompt(input: &Vec<SummaryTask>) -> String {
        let lines: Vec<String> = input
            .iter()
            .map(|t| {
                format!(
                    "- {} (Status: {})",
                    t.text,
                    if t.completed { "Done" } else { "To-Do" }
                )
            })
            .collect();

        format!(
            "You are an expert project manager. A list of tasks for a project will be provided. \
Your job is to generate a brief, concise summary of the project's status.\n\n\
- Briefly mention what has been completed.\n\
- Highlight what tasks are still pending.\n\n\
Tasks:\n{}\n\n\
Generate a summary of the project status.",
            lines.join("\n")
        )
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string", "description": "The concise summary of the project status." }
            },
            "required": ["summary"],
            "additionalProperties": false
        })
    }

    fn validate_output(output: &ProjectSummary) -> Result<(), AiError> {
        if output.summary.trim().is_empty() {
            return Err(AiError::SchemaMismatch("summary is empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Question answering
// ============================================================================

/// Fixed background the assistant answers from
pub const PROJECT_CONTEXT: &str = "\
- Project Alpha: A mobile app development project. Currently in the 'In Progress' state. Key tasks \
include designing homepage mockups (completed), developing the authentication API (completed), \
integrating a payment gateway (in progress), and setting up a deployment pipeline (in progress). \
The project is projected to be 20% over budget. The timeline is at risk due to a critical path dependency.

- Project Phoenix: A website redesign. Currently 'On Hold'. The last update was the successful \
deployment of v1.2 to staging, which received positive user feedback. The next focus was planned \
to be performance optimization.

- Project Neptune: A data analytics platform. This project is 'Completed'.

- General Information: The team's velocity is currently stable, and there are no immediate signs \
of resource burnout.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
}

pub struct ProjectQuestion;

impl AiFlow for ProjectQuestion {
    const NAME: &'static str = "project_question";

    type Input = String;
    type Output = Answer;

    fn validate_input(input: &String) -> Result<(), AiError> {
        require_text("question", input)
    }

    fn render_prompt(input: &String) -> String {
        format!(
            "You are an expert project management assistant. Your role is to answer questions \
based on the provided context about various projects. Be concise and helpful.\n\n\
Context:\n{}\n\n\
Question:\n{}\n\n\
Answer:",
            PROJECT_CONTEXT, input
        )
    }

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "answer": { "type": "string" }
            },
            "required": ["answer"],
            "additionalProperties": false
        })
    }
}
