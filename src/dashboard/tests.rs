//! Tests for dashboard module
//!
//! These tests verify:
//! - Summaries only cover projects with tasks and keep project order
//! - A model failure fails the whole listing
//! - Landing view counts

#[cfg(test)]
mod tests {
    use super::super::services::DashboardService;
    use super::super::*;
    use crate::ai::{AiError, ModelClient, ModelRequest};
    use crate::auth::AuthedUser;
    use crate::common::migrations::test_support::memory_pool;
    use crate::common::ApiError;
    use crate::projects::models::CreateProjectRequest;
    use crate::projects::ProjectsService;
    use crate::tasks::models::{BatchCreateTasksRequest, UpdateTaskRequest};
    use crate::tasks::TasksService;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes how many tasks the prompt listed
    struct CountingModel {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ModelClient for CountingModel {
        async fn generate(&self, request: ModelRequest) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AiError::UpstreamFailure("offline".to_string()));
            }
            let lines = request.prompt.matches("(Status: ").count();
            Ok(format!(r#"{{"summary":"{} tasks"}}"#, lines))
        }
    }

    fn model(fail: bool) -> CountingModel {
        CountingModel {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn user() -> AuthedUser {
        AuthedUser {
            id: "uid-1".to_string(),
            email: "one@example.com".to_string(),
            name: Some("One".to_string()),
            picture: None,
        }
    }

    async fn project(projects: &ProjectsService, name: &str) -> String {
        projects
            .create_project(
                "uid-1",
                CreateProjectRequest {
                    name: Some(name.to_string()),
                    description: Some("A project used in tests".to_string()),
                    status: Some("In Progress".to_string()),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn add_tasks(tasks: &TasksService, project_id: &str, texts: &[&str]) {
        tasks
            .create_tasks_batch(
                "uid-1",
                BatchCreateTasksRequest {
                    project_id: Some(project_id.to_string()),
                    tasks: texts.iter().map(|t| t.to_string()).collect(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_summaries_skip_projects_without_tasks() {
        let db = memory_pool().await;
        let projects = ProjectsService::new(db.clone());
        let tasks = TasksService::new(db.clone());

        let alpha = project(&projects, "Alpha").await;
        project(&projects, "Empty").await;
        let gamma = project(&projects, "Gamma").await;
        add_tasks(&tasks, &alpha, &["Design", "Build"]).await;
        add_tasks(&tasks, &gamma, &["Ship"]).await;

        let model = model(false);
        let summaries = DashboardService::new(db)
            .project_summaries(&model)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].project_name, "Alpha");
        assert_eq!(summaries[0].summary, "2 tasks");
        assert_eq!(summaries[1].project_name, "Gamma");
        assert_eq!(summaries[1].summary, "1 tasks");
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);

        let json = serde_json::to_value(&summaries[0]).unwrap();
        assert_eq!(json["projectName"], "Alpha");
    }

    #[tokio::test]
    async fn test_summaries_fail_as_a_whole() {
        let db = memory_pool().await;
        let projects = ProjectsService::new(db.clone());
        let alpha = project(&projects, "Alpha").await;
        add_tasks(&TasksService::new(db.clone()), &alpha, &["Design"]).await;

        let err = DashboardService::new(db)
            .project_summaries(&model(true))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_no_projects_means_no_model_calls() {
        let model = model(false);
        let summaries = DashboardService::new(memory_pool().await)
            .project_summaries(&model)
            .await
            .unwrap();
        assert!(summaries.is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let db = memory_pool().await;
        let projects = ProjectsService::new(db.clone());
        let tasks = TasksService::new(db.clone());
        let alpha = project(&projects, "Alpha").await;
        add_tasks(&tasks, &alpha, &["a", "b", "c", "d", "e", "f"]).await;

        let first = tasks.list_tasks_for_user("uid-1").await.unwrap()[0].clone();
        tasks
            .update_task(
                "uid-1",
                &first.id,
                UpdateTaskRequest {
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let view = DashboardService::new(db).overview(&user()).await;
        assert_eq!(view.project_count, 1);
        assert_eq!(view.completed_count, 1);
        assert_eq!(view.pending_count, 5);
        assert_eq!(view.recent_tasks.len(), services::RECENT_TASK_LIMIT);
        assert_eq!(view.user.email, "one@example.com");
    }

    #[tokio::test]
    async fn test_project_view_is_owner_only() {
        let db = memory_pool().await;
        let alpha = project(&ProjectsService::new(db.clone()), "Alpha").await;
        let dashboard = DashboardService::new(db);

        let view = dashboard.project_view(&user(), &alpha).await.unwrap();
        assert_eq!(view.project.name, "Alpha");

        let stranger = AuthedUser {
            id: "uid-2".to_string(),
            ..user()
        };
        assert!(matches!(
            dashboard.project_view(&stranger, &alpha).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
