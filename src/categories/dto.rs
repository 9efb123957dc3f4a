use serde::Deserialize;

use crate::error::FieldError;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

impl CategoryRequest {
    /// Validates the payload and returns the trimmed name on success.
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let name = self.name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Category name is required"));
        } else if name.len() > 50 {
            errors.push(FieldError::new(
                "name",
                "Category name must be between 1 and 50 characters",
            ));
        }
        if errors.is_empty() {
            Ok(name.to_string())
        } else {
            Err(errors)
        }
    }
}
