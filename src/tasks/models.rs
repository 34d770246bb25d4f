use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::{generate_task_id, now_rfc3339};

/// Task document
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub due_date: Option<String>,
    pub completed: bool,
    pub user_id: String,
    pub project_id: Option<String>,
    pub created_at: String,
}

impl Task {
    /// Fresh, incomplete task with a generated id
    pub fn new(
        user_id: &str,
        project_id: Option<&str>,
        text: &str,
        description: Option<String>,
        due_date: Option<String>,
    ) -> Self {
        Self {
            id: generate_task_id(),
            text: text.to_string(),
            description,
            due_date,
            completed: false,
            user_id: user_id.to_string(),
            project_id: project_id.map(str::to_string),
            created_at: now_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Body of `POST /api/tasks/batch`, usually the output of the smart breakdown flow
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateTasksRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub completed: Option<bool>,
}
