use super::models::UpdateProfileRequest;
use crate::common::validation::char_len;
use crate::common::{ValidationResult, Validator};

pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

pub struct UpdateProfileValidator;

impl Validator<UpdateProfileRequest> for UpdateProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.display_name {
            if name.trim().is_empty() {
                result.add_error("displayName", "Display name cannot be empty");
            } else if char_len(name) > MAX_DISPLAY_NAME_LENGTH {
                result.add_error("displayName", "Display name must not exceed 100 characters");
            }
        }

        if let Some(avatar) = &data.avatar_url {
            if !avatar.is_empty()
                && !avatar.starts_with("http://")
                && !avatar.starts_with("https://")
                && !avatar.starts_with('/')
            {
                result.add_error(
                    "avatarUrl",
                    "Avatar must be an http(s) URL or an absolute path",
                );
            }
        }

        if data.display_name.is_none() && data.avatar_url.is_none() {
            result.add_error("body", "Nothing to update");
        }

        result
    }
}
