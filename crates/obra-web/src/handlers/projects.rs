//! Project handlers

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use obra_contracts::ProjectParams;
use obra_services::{Callable, CreateProjectService};
use serde::Serialize;
use tracing::debug;

use super::page;
use crate::error::ApiResult;
use crate::extractors::{redirect_with, AppState, Flash};
use crate::representers::hal::{rels, HalLink, HalResource};
use crate::representers::ProjectRepresenter;

/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
    flash: Flash,
) -> ApiResult<impl IntoResponse> {
    let projects = state.store.list_projects().await?;
    Ok(page(ProjectRepresenter::represent_collection(projects), flash))
}

/// GET /projects/new
pub async fn new_project_form(flash: Flash) -> impl IntoResponse {
    let form = FormDescriptor {
        fields: vec![
            FormField::text("name", true, 120),
            FormField::text("location", false, 200),
            FormField::text("client", false, 120),
        ],
    };

    page(
        HalResource::new("ProjectForm", form).with_link(
            rels::CREATE,
            HalLink::new("/projects/new").method("POST"),
        ),
        flash,
    )
}

/// POST /projects/new
pub async fn create_project(
    State(state): State<AppState>,
    Form(params): Form<ProjectParams>,
) -> ApiResult<Response> {
    let result = CreateProjectService::new(state.store.clone())
        .call(params)
        .await?;

    if result.is_success() {
        return Ok(redirect_with("/projects", &[], Flash::notice("Project created")));
    }

    debug!(errors = %result.errors, "Project rejected");
    Ok(redirect_with(
        "/projects/new",
        &[],
        Flash::error(result.errors.to_string()),
    ))
}

/// Fields accepted by a form post
#[derive(Debug, Serialize)]
pub struct FormDescriptor {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub required: bool,
    pub max_length: u32,
}

impl FormField {
    pub fn text(name: &'static str, required: bool, max_length: u32) -> Self {
        Self {
            name,
            field_type: "text",
            required,
            max_length,
        }
    }
}
