//! Budget handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use obra_contracts::BudgetItemParams;
use obra_core::traits::Id;
use obra_models::{Entity, Project};
use obra_services::summary::budget_total;
use obra_services::{Callable, CreateBudgetItemService, NewBudgetItemRequest};
use tracing::debug;

use super::page;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{redirect_with, AppState, Flash};
use crate::representers::hal::{rels, HalCollection, HalLink};
use crate::representers::BudgetItemRepresenter;

/// GET /budget
pub async fn budget_overview(
    State(state): State<AppState>,
    flash: Flash,
) -> ApiResult<impl IntoResponse> {
    let projects = state.store.list_projects().await?;

    let mut rows = Vec::with_capacity(projects.len());
    for project in projects {
        let items = state.store.list_budget_items_for_project(project.id).await?;
        rows.push(BudgetItemRepresenter::represent_overview_row(
            project,
            budget_total(&items),
        ));
    }

    let overview = HalCollection::new("BudgetOverview", rows)
        .with_link(rels::SELF, HalLink::new("/budget"));
    Ok(page(overview, flash))
}

/// GET /projects/:id/budget-items
pub async fn list_budget_items(
    State(state): State<AppState>,
    Path(project_id): Path<Id>,
    flash: Flash,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Project::TYPE_NAME, project_id))?;

    let items = state.store.list_budget_items_for_project(project_id).await?;
    let total = budget_total(&items);

    Ok(page(
        BudgetItemRepresenter::represent_budget(project, items, total),
        flash,
    ))
}

/// POST /projects/:id/budget-items
pub async fn create_budget_item(
    State(state): State<AppState>,
    Path(project_id): Path<Id>,
    Form(params): Form<BudgetItemParams>,
) -> ApiResult<Response> {
    if !state.store.project_exists(project_id).await? {
        return Err(ApiError::not_found(Project::TYPE_NAME, project_id));
    }

    let result = CreateBudgetItemService::new(state.store.clone())
        .call(NewBudgetItemRequest { project_id, params })
        .await?;

    let back = format!("/projects/{}/budget-items", project_id);
    if result.is_success() {
        return Ok(redirect_with(&back, &[], Flash::notice("Budget item added")));
    }

    debug!(project_id, errors = %result.errors, "Budget item rejected");
    Ok(redirect_with(&back, &[], Flash::error(result.errors.to_string())))
}
