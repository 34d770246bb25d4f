//! Generic model-call pipeline shared by every flow

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::common::ApiError;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model output did not match the expected shape: {0}")]
    SchemaMismatch(String),

    #[error("model call failed: {0}")]
    UpstreamFailure(String),
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AiError::SchemaMismatch(_) | AiError::UpstreamFailure(_) => ApiError::ServiceUnavailable(
                "The AI assistant is unavailable right now. Please try again.".to_string(),
            ),
        }
    }
}

/// One call to the model
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Flow name, used for logging and as the schema name
    pub flow: &'static str,
    pub prompt: String,
    /// JSON schema the reply must follow
    pub output_schema: Value,
}

/// Hosted model endpoint. Returns the raw reply text, expected to be JSON.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> Result<String, AiError>;
}

/// A typed prompt: input type, template and output type
pub trait AiFlow {
    const NAME: &'static str;

    type Input: Send + Sync;
    type Output: DeserializeOwned + Send;

    fn validate_input(_input: &Self::Input) -> Result<(), AiError> {
        Ok(())
    }

    /// Answer without calling the model
    fn short_circuit(_input: &Self::Input) -> Option<Self::Output> {
        None
    }

    fn render_prompt(input: &Self::Input) -> String;

    fn output_schema() -> Value;

    fn validate_output(_output: &Self::Output) -> Result<(), AiError> {
        Ok(())
    }
}

/// Models sometimes wrap JSON in a markdown fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the model reply into `T`
pub fn parse_output<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| AiError::SchemaMismatch(e.to_string()))
}

/// Run `F` end to end with exactly one model call (or none when it short-circuits)
pub async fn run_flow<F: AiFlow>(
    model: &dyn ModelClient,
    input: F::Input,
) -> Result<F::Output, AiError> {
    F::validate_input(&input)?;

    if let Some(output) = F::short_circuit(&input) {
        debug!(flow = F::NAME, "Flow answered without a model call");
        return Ok(output);
    }

    let request = ModelRequest {
        flow: F::NAME,
        prompt: F::render_prompt(&input),
        output_schema: F::output_schema(),
    };

    let text = model.generate(request).await?;

    let output: F::Output = parse_output(&text).map_err(|e| {
        warn!(flow = F::NAME, error = %e, "Model reply failed to parse");
        e
    })?;
    F::validate_output(&output).map_err(|e| {
        warn!(flow = F::NAME, error = %e, "Model reply failed validation");
        e
    })?;

    debug!(flow = F::NAME, "Flow completed");
    Ok(output)
}
