//! Core error types
//!
//! Validation failures are collected per field so that a form handler can
//! surface them to the user in one message.

use thiserror::Error;

/// Core error type for all obra operations
#[derive(Error, Debug)]
pub enum ObraError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ObraError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        ObraError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ObraError::NotFound { .. } => 404,
            ObraError::Validation(_) => 422,
            ObraError::Database(_) | ObraError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ObraError::NotFound { .. } => "not_found",
            ObraError::Validation(_) => "validation_failed",
            ObraError::Database(_) => "database_error",
            ObraError::Internal(_) => "internal_error",
        }
    }
}

/// Validation errors collection (field name -> messages, in insertion order)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors, in the order they were added
    pub errors: Vec<(String, String)>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push((field.into(), message.into()));
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|(f, _)| f == field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
        self.base_errors.extend(other.base_errors);
    }

    /// Human readable messages, e.g. "Unit price must be a number"
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, message) in &self.errors {
            messages.push(format!("{} {}", humanize(field), message));
        }
        messages
    }

    /// Convert into a `Result`, `Ok` when nothing was collected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// "unit_price" -> "Unit price"
fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_messages_keep_order() {
        let mut errors = ValidationErrors::new();
        errors.add("project_id", "must be selected");
        errors.add("concept", "can't be blank");
        errors.add("amount", "must be greater than 0");

        assert_eq!(
            errors.full_messages(),
            vec![
                "Project must be selected",
                "Concept can't be blank",
                "Amount must be greater than 0",
            ]
        );
    }

    #[test]
    fn test_base_errors_come_first() {
        let mut errors = ValidationErrors::new();
        errors.add("unit_price", "must be a number");
        errors.add_base("Project does not exist");

        let messages = errors.full_messages();
        assert_eq!(messages[0], "Project does not exist");
        assert_eq!(messages[1], "Unit price must be a number");
    }

    #[test]
    fn test_has_error_and_get() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.add("name", "can't be blank");
        errors.add("name", "is too long (maximum is 120 characters)");

        assert!(errors.has_error("name"));
        assert!(!errors.has_error("client"));
        assert_eq!(errors.get("name").len(), 2);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ObraError::not_found("Project", 7).status_code(), 404);
        assert_eq!(
            ObraError::Validation(ValidationErrors::new()).error_code(),
            "validation_failed"
        );
        assert_eq!(ObraError::Database("down".into()).status_code(), 500);
    }
}
