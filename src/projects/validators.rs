use super::models::{CreateProjectRequest, ProjectStatus, UpdateProjectStatusRequest};
use crate::common::validation::char_len;
use crate::common::{ValidationResult, Validator};

pub const MIN_NAME_LENGTH: usize = 3;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_NAME_LENGTH: usize = 200;

const STATUS_MESSAGE: &str =
    "Status must be one of 'Not Started', 'In Progress', 'On Hold', 'Completed'.";

pub struct ProjectValidator;

impl Validator<CreateProjectRequest> for ProjectValidator {
    fn validate(&self, data: &CreateProjectRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        match data.name.as_deref() {
            None => result.add_error("name", "Project name is required."),
            Some(name) if char_len(name) < MIN_NAME_LENGTH => {
                result.add_error("name", "Project name must be at least 3 characters.")
            }
            Some(name) if char_len(name) > MAX_NAME_LENGTH => {
                result.add_error("name", "Project name must not exceed 200 characters.")
            }
            Some(_) => {}
        }

        match data.description.as_deref() {
            None => result.add_error("description", "Description is required."),
            Some(description) if char_len(description) < MIN_DESCRIPTION_LENGTH => {
                result.add_error("description", "Description must be at least 10 characters.")
            }
            Some(_) => {}
        }

        result.merge(validate_status(data.status.as_deref()));

        result
    }
}

pub struct ProjectStatusValidator;

impl Validator<UpdateProjectStatusRequest> for ProjectStatusValidator {
    fn validate(&self, data: &UpdateProjectStatusRequest) -> ValidationResult {
        validate_status(data.status.as_deref())
    }
}

fn validate_status(status: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::new();
    match status {
        None => result.add_error("status", "Status is required."),
        Some(raw) if raw.parse::<ProjectStatus>().is_err() => {
            result.add_error("status", STATUS_MESSAGE)
        }
        Some(_) => {}
    }
    result
}
