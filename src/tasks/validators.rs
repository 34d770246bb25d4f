use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::models::{BatchCreateTasksRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::common::validation::char_len;
use crate::common::{ValidationResult, Validator};

pub const MAX_TEXT_LENGTH: usize = 500;
pub const MAX_BATCH_SIZE: usize = 50;

static DUE_DATE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// `true` when `raw` is a real calendar date written as `YYYY-MM-DD`
pub fn is_valid_due_date(raw: &str) -> bool {
    let shape_ok = DUE_DATE_RE
        .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok())
        .as_ref()
        .map(|re| re.is_match(raw))
        .unwrap_or(false);
    shape_ok && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

fn validate_text(result: &mut ValidationResult, field: &str, text: Option<&str>) {
    match text.map(str::trim) {
        None | Some("") => result.add_error(field, "Task text is required."),
        Some(text) if char_len(text) > MAX_TEXT_LENGTH => {
            result.add_error(field, "Task text must not exceed 500 characters.")
        }
        Some(_) => {}
    }
}

pub struct TaskValidator;

impl Validator<CreateTaskRequest> for TaskValidator {
    fn validate(&self, data: &CreateTaskRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_text(&mut result, "text", data.text.as_deref());

        if let Some(due_date) = data.due_date.as_deref() {
            if !due_date.is_empty() && !is_valid_due_date(due_date) {
                result.add_error("dueDate", "Due date must be a valid date in YYYY-MM-DD format.");
            }
        }

        result
    }
}

pub struct BatchTasksValidator;

impl Validator<BatchCreateTasksRequest> for BatchTasksValidator {
    fn validate(&self, data: &BatchCreateTasksRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.tasks.is_empty() {
            result.add_error("tasks", "At least one task is required.");
        } else if data.tasks.len() > MAX_BATCH_SIZE {
            result.add_error("tasks", "No more than 50 tasks can be added at once.");
        }

        for (i, text) in data.tasks.iter().enumerate() {
            validate_text(&mut result, &format!("tasks[{}]", i), Some(text));
        }

        result
    }
}

pub struct UpdateTaskValidator;

impl Validator<UpdateTaskRequest> for UpdateTaskValidator {
    fn validate(&self, data: &UpdateTaskRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        if data.completed.is_none() {
            result.add_error("completed", "Completed flag is required.");
        }
        result
    }
}
