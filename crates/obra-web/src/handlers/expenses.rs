//! Expense handlers: daily ledger, multipart create, photo view

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use obra_contracts::{parse_date, parse_id, ExpenseParams};
use obra_core::traits::Id;
use obra_media::{human_size, PhotoPolicy, PhotoUpload};
use obra_models::{Entity, Expense, PhotoLocation};
use obra_services::{load_daily_ledger, Callable, CreateExpenseService, NewExpenseRequest};
use serde::Deserialize;
use tracing::{debug, warn};

use super::page;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{redirect_with, AppState, Flash};
use crate::representers::ExpenseRepresenter;

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub date: Option<String>,
    pub project_id: Option<String>,
}

/// GET /expenses?date=&project_id=
///
/// A missing or unreadable date shows today.
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
    flash: Flash,
) -> ApiResult<impl IntoResponse> {
    let date = query
        .date
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let project_id = query.project_id.as_deref().and_then(parse_id);

    let ledger = load_daily_ledger(state.store.as_ref(), date, project_id).await?;
    let projects = state.store.list_projects().await?;

    Ok(page(ExpenseRepresenter::represent_ledger(ledger, projects), flash))
}

/// POST /expenses (multipart/form-data)
pub async fn create_expense(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let request = match read_expense_form(multipart).await {
        Ok(request) => request,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(error = %e, "Expense upload exceeds body limit");
            let limit = human_size(state.config.photos.max_photo_bytes);
            return Ok(redirect_with(
                "/expenses",
                &[],
                Flash::error(format!("Photo is too large (maximum is {})", limit)),
            ));
        }
        Err(e) => {
            return Err(ApiError::bad_request(format!(
                "Failed to read multipart field: {}",
                e.body_text()
            )))
        }
    };

    // Echo the submitted filter back when the form is rejected
    let submitted_project = request.params.project_id.as_deref().and_then(parse_id);
    let submitted_date = request.params.date.as_deref().and_then(parse_date);

    let service = CreateExpenseService::new(state.store.clone())
        .with_media(state.media.clone())
        .with_policy(PhotoPolicy::from(&state.config.photos));
    let result = service.call(request).await?;

    if let Some(created) = result.result {
        let flash = if created.photo_dropped {
            Flash::notice("Expense saved without its photo (photo storage unavailable)")
        } else {
            Flash::notice("Expense saved")
        };
        return Ok(redirect_with(
            "/expenses",
            &ledger_params(Some(created.expense.project_id), Some(created.expense.spent_on)),
            flash,
        ));
    }

    debug!(errors = %result.errors, "Expense rejected");
    Ok(redirect_with(
        "/expenses",
        &ledger_params(submitted_project, submitted_date),
        Flash::error(result.errors.to_string()),
    ))
}

/// GET /expenses/:id/photo
pub async fn expense_photo(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Response> {
    let expense = state
        .store
        .find_expense(id)
        .await?
        .ok_or_else(|| ApiError::not_found(Expense::TYPE_NAME, id))?;

    match expense.photo_location() {
        PhotoLocation::Hosted { url } => Ok(Redirect::temporary(&url).into_response()),
        PhotoLocation::Blob => {
            let photo = state
                .store
                .find_expense_photo(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Photo", id))?;
            Ok(([(header::CONTENT_TYPE, photo.photo_mime)], photo.photo_bytes).into_response())
        }
        PhotoLocation::None => Err(ApiError::not_found("Photo", id)),
    }
}

fn ledger_params(project_id: Option<Id>, date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(2);
    if let Some(id) = project_id {
        params.push(("project_id", id.to_string()));
    }
    if let Some(date) = date {
        params.push(("date", date.to_string()));
    }
    params
}

/// Collect the text fields and the `photo` file of the expense form
async fn read_expense_form(mut multipart: Multipart) -> Result<NewExpenseRequest, MultipartError> {
    let mut params = ExpenseParams::default();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "photo" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                photo = Some(PhotoUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            "project_id" => params.project_id = Some(field.text().await?),
            "date" => params.date = Some(field.text().await?),
            "concept" => params.concept = Some(field.text().await?),
            "amount" => params.amount = Some(field.text().await?),
            "category" => params.category = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(NewExpenseRequest { params, photo })
}
