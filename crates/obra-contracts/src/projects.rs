//! Create contract for projects

use obra_core::error::ValidationErrors;
use obra_models::NewProject;
use serde::Deserialize;
use validator::Validate;

use crate::base::{merge_length_errors, present_owned, require_text, Contract, ValidationResult};

/// Raw project form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectParams {
    pub name: Option<String>,
    pub location: Option<String>,
    pub client: Option<String>,
}

/// Contract for creating a new project
#[derive(Debug, Default)]
pub struct CreateProjectContract;

impl CreateProjectContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract<ProjectParams> for CreateProjectContract {
    type Output = NewProject;

    fn validate(&self, params: &ProjectParams) -> ValidationResult<NewProject> {
        let mut errors = ValidationErrors::new();

        let project = NewProject {
            name: require_text("name", params.name.as_deref(), &mut errors),
            location: present_owned(params.location.as_deref()),
            client: present_owned(params.client.as_deref()),
        };
        merge_length_errors(project.validate(), &mut errors);

        errors.into_result().map(|_| project)
    }
}
