// Common validation types and traits

use serde::Serialize;

/// A single field-level problem with a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    /// Turns an invalid result into `Err` so callers can use `?`
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// Length in characters, not bytes, so "Ünï" counts as three.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_valid() {
        let result = ValidationResult::new();
        assert!(result.is_valid);
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_merge_collects_errors() {
        let mut first = ValidationResult::new();
        first.add_error("name", "too short");

        let mut second = ValidationResult::new();
        second.add_error("description", "too short");

        first.merge(second);
        let errors = first.into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field, "description");
    }

    #[test]
    fn test_char_len_counts_unicode_scalars() {
        assert_eq!(char_len("Ünï"), 3);
        assert_eq!(char_len(""), 0);
    }
}
