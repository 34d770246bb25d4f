//! Tests for ai module
//!
//! These tests verify:
//! - The pipeline makes exactly one model call and checks the reply
//! - Summarization of an empty list never reaches the model
//! - Prompt templates carry their input
//! - Error mapping to HTTP statuses

#[cfg(test)]
mod tests {
    use super::super::flows::*;
    use super::super::pipeline::AiFlow;
    use super::super::*;
    use crate::common::ApiError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Replays a canned reply and records every request
    struct FakeModel {
        reply: Result<String, String>,
        calls: Mutex<Vec<ModelRequest>>,
    }

    impl FakeModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<ModelRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for FakeModel {
        async fn generate(&self, request: ModelRequest) -> Result<String, AiError> {
            self.calls.lock().unwrap().push(request);
            self.reply.clone().map_err(AiError::UpstreamFailure)
        }
    }

    // ============================================================================
    // Pipeline Tests
    // ============================================================================

    #[tokio::test]
    async fn test_summarization_of_empty_list_skips_model() {
        let model = FakeModel::replying(r#"{"summary":"should not be used"}"#);

        let output = run_flow::<Summarization>(&model, Vec::new()).await.unwrap();

        assert_eq!(output.summary, NO_TASKS_SUMMARY);
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_summarization_calls_model_once() {
        let model = FakeModel::replying(r#"{"summary":"Design is done, API pending."}"#);
        let tasks = vec![
            SummaryTask {
                text: "Design".to_string(),
                completed: true,
            },
            SummaryTask {
                text: "API".to_string(),
                completed: false,
            },
        ];

        let output = run_flow::<Summarization>(&model, tasks).await.unwrap();
        assert_eq!(output.summary, "Design is done, API pending.");

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].flow, "summarization");
        assert!(calls[0].prompt.contains("- Design (Status: Done)"));
        assert!(calls[0].prompt.contains("- API (Status: To-Do)"));
        assert_eq!(calls[0].output_schema["required"][0], "summary");
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_model() {
        let model = FakeModel::replying("{}");
        let err = run_flow::<SmartTaskBreakdown>(&model, "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_schema_mismatch_on_wrong_shape() {
        let model = FakeModel::replying(r#"{"level":"Severe","details":"x"}"#);
        let err = run_flow::<RiskPrediction>(
            &model,
            RiskInput {
                title: "Migrate database".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::SchemaMismatch(_)));

        let model = FakeModel::replying("not json at all");
        let err = run_flow::<ProjectQuestion>(&model, "Status?".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::SchemaMismatch(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_surfaced() {
        let model = FakeModel::failing("connection reset");
        let err = run_flow::<ProjectQuestion>(&model, "Is Alpha on track?".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::UpstreamFailure(_)));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fenced_reply_is_accepted() {
        let model = FakeModel::replying("```json\n{\"tasks\":[\"Plan\",\"Build\"]}\n```");
        let output = run_flow::<SmartTaskBreakdown>(&model, "Launch the beta".to_string())
            .await
            .unwrap();
        assert_eq!(output.tasks, vec!["Plan", "Build"]);
    }

    // ============================================================================
    // Flow Tests
    // ============================================================================

    #[tokio::test]
    async fn test_extraction_validates_due_date() {
        let model = FakeModel::replying(
            r#"{"title":"Call Bob","description":"Call Bob","dueDate":"next Tuesday"}"#,
        );
        let err = run_flow::<ExtractTaskDetails>(&model, "call bob next tuesday".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::SchemaMismatch(_)));

        let model =
            FakeModel::replying(r#"{"title":"Call Bob","description":"Call Bob about the contract"}"#);
        let task = run_flow::<ExtractTaskDetails>(&model, "call bob".to_string())
            .await
            .unwrap();
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_extraction_prompt_embeds_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let prompt = ExtractTaskDetails::prompt_for("Email Ann on Friday", today);
        assert!(prompt.contains("Current Date: 2024-03-05"));
        assert!(prompt.contains("Prompt: Email Ann on Friday"));
    }

    #[test]
    fn test_question_prompt_includes_context() {
        let prompt = ProjectQuestion::render_prompt(&"How is Phoenix?".to_string());
        assert!(prompt.contains("Project Phoenix"));
        assert!(prompt.ends_with("Question:\nHow is Phoenix?\n\nAnswer:"));
    }

    #[test]
    fn test_risk_level_serializes_plainly() {
        let risk = RiskAssessment {
            level: RiskLevel::High,
            details: "Critical path".to_string(),
        };
        let json = serde_json::to_value(&risk).unwrap();
        assert_eq!(json["level"], "High");
    }

    // ============================================================================
    // Error Mapping Tests
    // ============================================================================

    #[test]
    fn test_ai_errors_map_to_http_errors() {
        assert!(matches!(
            ApiError::from(AiError::InvalidInput("x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(AiError::SchemaMismatch("x".into())),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(AiError::UpstreamFailure("x".into())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}
