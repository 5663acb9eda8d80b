//! Portfolio dashboard

use axum::{extract::State, response::IntoResponse};
use obra_services::load_portfolio_summary;

use crate::error::ApiResult;
use crate::extractors::{AppState, HalResponse};
use crate::representers::SummaryRepresenter;

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let summary = load_portfolio_summary(state.store.as_ref()).await?;
    Ok(HalResponse(SummaryRepresenter::represent_portfolio(summary)))
}
