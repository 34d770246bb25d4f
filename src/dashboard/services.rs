use sqlx::SqlitePool;
use tracing::{debug, error, warn};

use super::models::{DashboardView, ProjectView, ProjectsView, SummaryResponse, ViewerInfo};
use crate::ai::flows::{Summarization, SummaryTask};
use crate::ai::{run_flow, ModelClient};
use crate::auth::AuthedUser;
use crate::common::ApiError;
use crate::projects::ProjectsService;
use crate::tasks::TasksService;

/// Tasks shown on the dashboard landing view
pub const RECENT_TASK_LIMIT: usize = 5;

pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Summaries for every project that has at least one task, in project order.
    /// Any failure aborts the whole listing.
    pub async fn project_summaries(
        &self,
        model: &dyn ModelClient,
    ) -> Result<Vec<SummaryResponse>, ApiError> {
        let projects = ProjectsService::new(self.db.clone());
        let tasks = TasksService::new(self.db.clone());

        let mut summaries = Vec::new();
        for project in projects.list_all_projects().await? {
            let project_tasks = tasks.list_tasks_for_project(&project.id).await?;
            if project_tasks.is_empty() {
                continue;
            }

            let input = project_tasks
                .into_iter()
                .map(|t| SummaryTask {
                    text: t.text,
                    completed: t.completed,
                })
                .collect();

            let output = run_flow::<Summarization>(model, input).await.map_err(|e| {
                error!(project_id = %project.id, error = %e, "Summarization failed");
                ApiError::from(e)
            })?;

            summaries.push(SummaryResponse {
                project_name: project.name,
                summary: output.summary,
            });
        }

        debug!(count = summaries.len(), "Built project summaries");
        Ok(summaries)
    }

    /// Landing view. Store errors degrade to empty lists.
    pub async fn overview(&self, user: &AuthedUser) -> DashboardView {
        let projects = ProjectsService::new(self.db.clone())
            .list_projects_for_user(&user.id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, user_id = %user.id, "Falling back to no projects");
                Vec::new()
            });
        let tasks = TasksService::new(self.db.clone())
            .list_tasks_for_user(&user.id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, user_id = %user.id, "Falling back to no tasks");
                Vec::new()
            });

        let completed_count = tasks.iter().filter(|t| t.completed).count();

        DashboardView {
            view: "dashboard",
            user: ViewerInfo::from(user),
            project_count: projects.len(),
            pending_count: tasks.len() - completed_count,
            completed_count,
            recent_tasks: tasks.into_iter().take(RECENT_TASK_LIMIT).collect(),
        }
    }

    pub async fn projects_view(&self, user: &AuthedUser) -> ProjectsView {
        let projects = ProjectsService::new(self.db.clone())
            .list_projects_for_user(&user.id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, user_id = %user.id, "Falling back to no projects");
                Vec::new()
            });

        ProjectsView {
            view: "projects",
            projects,
        }
    }

    /// Project detail; a project the caller does not own is a 404
    pub async fn project_view(
        &self,
        user: &AuthedUser,
        project_id: &str,
    ) -> Result<ProjectView, ApiError> {
        let project = ProjectsService::new(self.db.clone())
            .get_owned_project(&user.id, project_id)
            .await?;
        let tasks = TasksService::new(self.db.clone())
            .list_tasks_for_project(project_id)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, project_id = %project_id, "Falling back to no tasks");
                Vec::new()
            });

        Ok(ProjectView {
            view: "project",
            project,
            tasks,
        })
    }
}
