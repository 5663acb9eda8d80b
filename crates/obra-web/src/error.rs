//! HTTP error handling
//!
//! Rejected form input never reaches this type: handlers answer it with a
//! redirect carrying a flash message. `ApiError` covers missing resources,
//! unreadable requests and infrastructure failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use obra_core::error::ObraError;
use obra_db::RepositoryError;
use serde::Serialize;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ObraError> for ApiError {
    fn from(err: ObraError) -> Self {
        match err {
            ObraError::NotFound { entity, value, .. } => ApiError::NotFound {
                resource: entity,
                id: value,
            },
            ObraError::Validation(errors) => ApiError::BadRequest(errors.to_string()),
            other => {
                tracing::error!(error = %other, code = other.error_code(), "Request failed");
                ApiError::Internal("An internal error occurred".into())
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ObraError::from(err).into()
    }
}

#[derive(Serialize)]
struct HalError {
    #[serde(rename = "_type")]
    type_name: &'static str,
    #[serde(rename = "errorIdentifier")]
    error_identifier: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_identifier, message) = match self {
            ApiError::NotFound { resource, id } => (
                "urn:obra:errors:NotFound",
                format!("{} with id {} not found", resource, id),
            ),
            ApiError::BadRequest(msg) => ("urn:obra:errors:InvalidRequestBody", msg),
            ApiError::Internal(msg) => ("urn:obra:errors:InternalError", msg),
        };

        let error = HalError {
            type_name: "Error",
            error_identifier,
            message,
        };
        (status, Json(error)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
