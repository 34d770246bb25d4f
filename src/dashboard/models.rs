use serde::Serialize;

use crate::auth::AuthedUser;
use crate::projects::Project;
use crate::tasks::Task;

/// One entry of `GET /api/summaries`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub project_name: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<&AuthedUser> for ViewerInfo {
    fn from(user: &AuthedUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub view: &'static str,
    pub session_endpoint: &'static str,
    /// Any non-empty identity token is accepted
    pub dev_mode: bool,
}

/// `GET /dashboard`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub view: &'static str,
    pub user: ViewerInfo,
    pub project_count: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub recent_tasks: Vec<Task>,
}

/// `GET /dashboard/projects`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsView {
    pub view: &'static str,
    pub projects: Vec<Project>,
}

/// `GET /dashboard/project/:id`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub view: &'static str,
    pub project: Project,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
