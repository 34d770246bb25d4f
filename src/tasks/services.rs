use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::models::{BatchCreateTasksRequest, CreateTaskRequest, Task, UpdateTaskRequest};
use super::validators::{BatchTasksValidator, TaskValidator, UpdateTaskValidator};
use crate::common::{ApiError, Validator};
use crate::projects::ProjectsService;

const TASK_COLUMNS: &str =
    "id, text, description, due_date, completed, user_id, project_id, created_at";

/// Insert one task row on an open connection or transaction
pub async fn insert_task(conn: &mut SqliteConnection, task: &Task) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tasks (id, text, description, due_date, completed, user_id, project_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&task.id)
    .bind(&task.text)
    .bind(&task.description)
    .bind(&task.due_date)
    .bind(task.completed)
    .bind(&task.user_id)
    .bind(&task.project_id)
    .bind(&task.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct TasksService {
    db: SqlitePool,
}

impl TasksService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Tasks can only be attached to a project the caller owns
    async fn check_project_owner(
        &self,
        user_id: &str,
        project_id: Option<&str>,
    ) -> Result<(), ApiError> {
        if let Some(project_id) = project_id {
            ProjectsService::new(self.db.clone())
                .get_owned_project(user_id, project_id)
                .await?;
        }
        Ok(())
    }

    // ============================================================================
    // Task CRUD Operations
    // ============================================================================

    /// Create a single task
    pub async fn create_task(
        &self,
        user_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        TaskValidator.validate(&request).into_result()?;

        let project_id = non_empty(request.project_id);
        self.check_project_owner(user_id, project_id.as_deref())
            .await?;

        let text = request.text.unwrap_or_default();
        let task = Task::new(
            user_id,
            project_id.as_deref(),
            text.trim(),
            non_empty(request.description),
            non_empty(request.due_date),
        );

        let mut conn = self.db.acquire().await?;
        insert_task(&mut conn, &task).await?;

        info!(task_id = %task.id, user_id = %user_id, "Created task");

        Ok(task)
    }

    /// Create several tasks at once; either all are stored or none
    pub async fn create_tasks_batch(
        &self,
        user_id: &str,
        request: BatchCreateTasksRequest,
    ) -> Result<Vec<Task>, ApiError> {
        BatchTasksValidator.validate(&request).into_result()?;

        let project_id = non_empty(request.project_id);
        self.check_project_owner(user_id, project_id.as_deref())
            .await?;

        let tasks: Vec<Task> = request
            .tasks
            .iter()
            .map(|text| Task::new(user_id, project_id.as_deref(), text.trim(), None, None))
            .collect();

        let mut tx = self.db.begin().await?;
        for task in &tasks {
            insert_task(&mut tx, task).await?;
        }
        tx.commit().await?;

        info!(count = tasks.len(), user_id = %user_id, "Created task batch");

        Ok(tasks)
    }

    /// Get task by ID regardless of owner
    pub async fn get_task(&self, task_id: &str) -> Result<Option<Task>, ApiError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = ?",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(task)
    }

    /// Get a task the caller owns; other users' tasks are reported as missing
    pub async fn get_owned_task(&self, user_id: &str, task_id: &str) -> Result<Task, ApiError> {
        self.get_task(task_id)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
    }

    /// Caller's tasks, newest first
    pub async fn list_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(tasks)
    }

    /// Tasks in a project, oldest first
    pub async fn list_tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE project_id = ? ORDER BY created_at ASC, rowid ASC",
            TASK_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(tasks)
    }

    /// Set the completed flag on a task the caller owns
    pub async fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        UpdateTaskValidator.validate(&request).into_result()?;
        let completed = request.completed.unwrap_or_default();

        let mut task = self.get_owned_task(user_id, task_id).await?;

        sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(task_id)
            .execute(&self.db)
            .await?;

        info!(task_id = %task_id, completed, "Updated task");

        task.completed = completed;
        Ok(task)
    }

    /// Re-insert a previously deleted task as it was
    pub async fn restore_task(&self, user_id: &str, task: &Task) -> Result<(), ApiError> {
        if task.user_id != user_id {
            return Err(ApiError::NotFound("Task not found".to_string()));
        }

        let mut conn = self.db.acquire().await?;
        insert_task(&mut conn, task).await?;

        info!(task_id = %task.id, user_id = %user_id, "Restored task");
        Ok(())
    }

    /// Delete a task the caller owns
    pub async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.get_owned_task(user_id, task_id).await?;

        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.db)
            .await?;

        info!(task_id = %task_id, user_id = %user_id, "Deleted task");
        Ok(())
    }
}
