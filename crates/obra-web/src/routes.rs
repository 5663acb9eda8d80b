//! Application routes

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{budget_items, dashboard, expenses, index, projects};

/// Create the application router
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_bytes;
    router()
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Routes without state or layers
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .merge(projects_router())
        .route("/budget", get(budget_items::budget_overview))
        .merge(expenses_router())
        .route("/dashboard", get(dashboard::dashboard))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::list_projects))
        .route(
            "/projects/new",
            get(projects::new_project_form).post(projects::create_project),
        )
        .route(
            "/projects/:id/budget-items",
            get(budget_items::list_budget_items).post(budget_items::create_budget_item),
        )
}

fn expenses_router() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/expenses/:id/photo", get(expenses::expense_photo))
}
