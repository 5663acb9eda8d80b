//! Base service traits

use async_trait::async_trait;
use obra_core::error::ValidationErrors;
use obra_core::result::{ObraResult, ServiceResult};
use obra_db::RepositoryError;

/// Base trait for all callable services.
///
/// Rejected input comes back as a failed `ServiceResult`; storage problems
/// come back as `Err`.
#[async_trait]
pub trait Callable<Params, Output> {
    /// Execute the service
    async fn call(&self, params: Params) -> ObraResult<ServiceResult<Output>>;
}

/// Error added when the owning project does not exist
pub(crate) fn missing_project() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add("project_id", "does not exist");
    errors
}

/// Turn an insert result into a service outcome: a foreign key miss is a
/// validation failure, anything else stays an error.
pub(crate) fn inserted<T>(
    result: Result<T, RepositoryError>,
) -> ObraResult<ServiceResult<T>> {
    match result {
        Ok(row) => Ok(ServiceResult::success(row)),
        Err(RepositoryError::MissingReference(_)) => Ok(ServiceResult::failure(missing_project())),
        Err(e) => Err(e.into()),
    }
}
