//! Result type aliases and service result pattern

use crate::error::{ObraError, ValidationErrors};

/// Standard Result type for obra operations
pub type ObraResult<T> = Result<T, ObraError>;

/// Outcome of a service call that may be rejected by validation.
///
/// A failed `ServiceResult` is an expected, user-facing outcome (bad form
/// input). Infrastructure failures travel as `Err(ObraError)` instead.
#[derive(Debug)]
pub struct ServiceResult<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// The result value (if successful)
    pub result: Option<T>,
    /// Errors (if failed)
    pub errors: ValidationErrors,
}

impl<T> ServiceResult<T> {
    /// Create a successful result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
        }
    }

    /// Create a failed result with errors
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
        }
    }

    /// Create a failed result with a single field error
    pub fn failure_on(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::failure(errors)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Map the result value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResult<U> {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
        }
    }

    /// Convert to standard Result
    pub fn into_result(self) -> ObraResult<T> {
        if self.success {
            self.result.ok_or_else(|| {
                ObraError::Internal("ServiceResult success but no result value".into())
            })
        } else {
            Err(ObraError::Validation(self.errors))
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(errors) => ServiceResult::failure(errors),
        }
    }
}
