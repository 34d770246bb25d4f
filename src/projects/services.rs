use sqlx::SqlitePool;
use tracing::info;

use super::models::{CreateProjectRequest, Project, ProjectStatus, UpdateProjectStatusRequest};
use super::validators::{ProjectStatusValidator, ProjectValidator};
use crate::common::{generate_project_id, now_rfc3339, ApiError, Validator};
use crate::tasks::models::Task;
use crate::tasks::services::insert_task;

const PROJECT_COLUMNS: &str = "id, name, description, status, user_id, created_at";

pub const WELCOME_PROJECT_NAME: &str = "My First Project";
const WELCOME_PROJECT_DESCRIPTION: &str =
    "Your starter project. Rename it, change its status or add tasks to get going.";
pub const WELCOME_TASKS: [&str; 3] = [
    "Welcome to your new project!",
    "You can add new tasks using the 'New Task' button.",
    "You can also use the AI-powered 'Smart Task' feature to automatically generate tasks for you.",
];

pub struct ProjectsService {
    db: SqlitePool,
}

impl ProjectsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Project CRUD Operations
    // ============================================================================

    /// Create a project owned by `user_id`
    pub async fn create_project(
        &self,
        user_id: &str,
        request: CreateProjectRequest,
    ) -> Result<Project, ApiError> {
        ProjectValidator.validate(&request).into_result()?;

        let status: ProjectStatus = request
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(ApiError::BadRequest)?;

        let project = Project {
            id: generate_project_id(),
            name: request.name.unwrap_or_default(),
            description: request.description.unwrap_or_default(),
            status: status.as_str().to_string(),
            user_id: user_id.to_string(),
            created_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, status, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(&project.user_id)
        .bind(&project.created_at)
        .execute(&self.db)
        .await?;

        info!(project_id = %project.id, user_id = %user_id, "Created project");

        Ok(project)
    }

    /// Get project by ID regardless of owner
    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>, ApiError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(project_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(project)
    }

    /// Get a project the caller owns; other users' projects are reported as missing
    pub async fn get_owned_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Project, ApiError> {
        self.get_project(project_id)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
    }

    /// Projects owned by `user_id`, newest first
    pub async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, ApiError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            PROJECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(projects)
    }

    /// Every project, oldest first
    pub async fn list_all_projects(&self) -> Result<Vec<Project>, ApiError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY created_at ASC, rowid ASC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(projects)
    }

    /// Change the status of a project the caller owns
    pub async fn update_status(
        &self,
        user_id: &str,
        project_id: &str,
        request: UpdateProjectStatusRequest,
    ) -> Result<Project, ApiError> {
        ProjectStatusValidator.validate(&request).into_result()?;
        let status: ProjectStatus = request
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(ApiError::BadRequest)?;

        let mut project = self.get_owned_project(user_id, project_id).await?;

        sqlx::query("UPDATE projects SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(project_id)
            .execute(&self.db)
            .await?;

        info!(project_id = %project_id, status = %status, "Updated project status");

        project.status = status.as_str().to_string();
        Ok(project)
    }

    /// Seed the starter project and its welcome tasks in one transaction
    pub async fn create_welcome_project(&self, user_id: &str) -> Result<Project, ApiError> {
        let project = Project {
            id: generate_project_id(),
            name: WELCOME_PROJECT_NAME.to_string(),
            description: WELCOME_PROJECT_DESCRIPTION.to_string(),
            status: ProjectStatus::NotStarted.as_str().to_string(),
            user_id: user_id.to_string(),
            created_at: now_rfc3339(),
        };

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, status, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(&project.user_id)
        .bind(&project.created_at)
        .execute(&mut *tx)
        .await?;

        for text in WELCOME_TASKS {
            let task = Task::new(user_id, Some(&project.id), text, None, None);
            insert_task(&mut tx, &task).await?;
        }

        tx.commit().await?;

        info!(project_id = %project.id, user_id = %user_id, "Seeded welcome project");

        Ok(project)
    }
}
