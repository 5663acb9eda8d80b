//! Create service for expenses
//!
//! Steps: contract validation, photo policy, project existence, photo
//! placement (hosted media store or database blob), single-row insert.
//! When the hosted media store fails, the expense is still saved, without
//! its photo.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use obra_contracts::{Contract, CreateExpenseContract, ExpenseParams};
use obra_core::result::{ObraResult, ServiceResult};
use obra_db::Store;
use obra_media::{generate_photo_key, MediaStore, PhotoPolicy, PhotoUpload, ValidatedPhoto};
use obra_models::{Expense, NewPhoto};
use tracing::{info, instrument, warn};

use crate::base::{inserted, missing_project, Callable};

/// Expense form plus the optional photo file
#[derive(Debug, Clone, Default)]
pub struct NewExpenseRequest {
    pub params: ExpenseParams,
    pub photo: Option<PhotoUpload>,
}

/// Outcome of a successful expense creation
#[derive(Debug, Clone)]
pub struct CreatedExpense {
    pub expense: Expense,
    /// A photo was submitted but could not be stored
    pub photo_dropped: bool,
}

/// Service for creating expenses
pub struct CreateExpenseService {
    store: Arc<dyn Store>,
    media: Option<Arc<dyn MediaStore>>,
    policy: PhotoPolicy,
    today: Option<NaiveDate>,
}

impl CreateExpenseService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            media: None,
            policy: PhotoPolicy::default(),
            today: None,
        }
    }

    /// Send photos to a hosted media store instead of the database
    pub fn with_media(mut self, media: Option<Arc<dyn MediaStore>>) -> Self {
        self.media = media;
        self
    }

    pub fn with_policy(mut self, policy: PhotoPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fix the date used when the form leaves it blank
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Where the photo ends up; `None` when the hosted store failed
    async fn place_photo(&self, spent_on: NaiveDate, photo: ValidatedPhoto) -> Option<NewPhoto> {
        let Some(media) = &self.media else {
            return Some(NewPhoto::Blob {
                filename: photo.filename,
                mime: photo.mime,
                data: photo.data.to_vec(),
            });
        };

        let key = generate_photo_key(spent_on);
        match media.upload(&key, &photo).await {
            Ok(stored) => Some(NewPhoto::Hosted {
                filename: photo.filename,
                mime: photo.mime,
                url: stored.url,
                reference: stored.reference,
            }),
            Err(e) => {
                warn!(
                    error = %e,
                    store = media.name(),
                    key = %key,
                    "Photo upload failed, saving expense without photo"
                );
                None
            }
        }
    }
}

#[async_trait]
impl Callable<NewExpenseRequest, CreatedExpense> for CreateExpenseService {
    #[instrument(skip(self, request), fields(has_photo = request.photo.is_some()))]
    async fn call(&self, request: NewExpenseRequest) -> ObraResult<ServiceResult<CreatedExpense>> {
        let contract = CreateExpenseContract::new(self.today());
        let validated = contract.validate(&request.params);

        let photo = match request.photo {
            Some(upload) => self.policy.check(upload),
            None => Ok(None),
        };

        let (expense, photo) = match (validated, photo) {
            (Ok(expense), Ok(photo)) => (expense, photo),
            (validated, photo) => {
                let mut errors = validated.err().unwrap_or_default();
                if let Err(e) = photo {
                    errors.add("photo", e.to_string());
                }
                return Ok(ServiceResult::failure(errors));
            }
        };

        if !self.store.project_exists(expense.project_id).await? {
            return Ok(ServiceResult::failure(missing_project()));
        }

        let mut photo_dropped = false;
        let expense = match photo {
            Some(photo) => match self.place_photo(expense.spent_on, photo).await {
                Some(placed) => expense.with_photo(placed),
                None => {
                    photo_dropped = true;
                    expense.without_photo()
                }
            },
            None => expense,
        };

        let result = inserted(self.store.create_expense(expense).await)?;
        if let Some(expense) = &result.result {
            info!(
                id = expense.id,
                project_id = expense.project_id,
                amount = %expense.amount_or_zero(),
                "Expense created"
            );
        }

        Ok(result.map(|expense| CreatedExpense {
            expense,
            photo_dropped,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use obra_db::MemoryStore;
    use obra_media::MemoryMediaStore;
    use obra_models::{NewProject, PhotoLocation};
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    fn params(project_id: i64, amount: &str) -> ExpenseParams {
        ExpenseParams {
            project_id: Some(project_id.to_string()),
            date: Some("2024-05-02".into()),
            concept: Some("Cemento".into()),
            amount: Some(amount.into()),
            category: None,
        }
    }

    fn jpeg(len: usize) -> PhotoUpload {
        PhotoUpload {
            filename: "ticket.jpg".into(),
            content_type: Some("image/jpeg".into()),
            data: Bytes::from(vec![0xFFu8; len]),
        }
    }

    async fn setup() -> (Arc<MemoryStore>, i64) {
        let store = Arc::new(MemoryStore::new());
        let project = store.create_project(NewProject::new("Casa A")).await.unwrap();
        (store, project.id)
    }

    #[tokio::test]
    async fn test_amount_rules() {
        let (store, project_id) = setup().await;
        let service = CreateExpenseService::new(store.clone()).with_today(today());

        let zero = service
            .call(NewExpenseRequest {
                params: params(project_id, "0"),
                photo: None,
            })
            .await
            .unwrap();
        assert!(zero.is_failure());

        let created = service
            .call(NewExpenseRequest {
                params: params(project_id, "150.50"),
                photo: None,
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(created.expense.amount, Some(dec!(150.50)));
        assert_eq!(store.list_expenses_on(today()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_photo_kept_as_blob_without_media_store() {
        let (store, project_id) = setup().await;
        let service = CreateExpenseService::new(store.clone()).with_today(today());

        let created = service
            .call(NewExpenseRequest {
                params: params(project_id, "200"),
                photo: Some(jpeg(64)),
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();

        assert!(!created.photo_dropped);
        assert_eq!(created.expense.photo_location(), PhotoLocation::Blob);
        let photo = store.find_expense_photo(created.expense.id).await.unwrap().unwrap();
        assert_eq!(photo.photo_mime, "image/jpeg");
        assert_eq!(photo.photo_bytes.len(), 64);
    }

    #[tokio::test]
    async fn test_photo_sent_to_media_store() {
        let (store, project_id) = setup().await;
        let media = Arc::new(MemoryMediaStore::new());
        let service = CreateExpenseService::new(store.clone())
            .with_media(Some(media.clone()))
            .with_today(today());

        let created = service
            .call(NewExpenseRequest {
                params: params(project_id, "200"),
                photo: Some(jpeg(64)),
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let reference = created.expense.photo_ref.clone().unwrap();
        assert!(reference.starts_with("expenses/2024/05/02/"));
        assert!(matches!(created.expense.photo_location(), PhotoLocation::Hosted { .. }));
        assert!(media.get(&reference).await.is_some());
        assert!(store.find_expense_photo(created.expense.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_media_outage_saves_without_photo() {
        let (store, project_id) = setup().await;
        let media = Arc::new(MemoryMediaStore::unavailable());
        let service = CreateExpenseService::new(store.clone())
            .with_media(Some(media))
            .with_today(today());

        let created = service
            .call(NewExpenseRequest {
                params: params(project_id, "200"),
                photo: Some(jpeg(64)),
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();

        assert!(created.photo_dropped);
        assert_eq!(created.expense.photo_location(), PhotoLocation::None);
        assert_eq!(store.list_expenses_for_project(project_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_photo_and_fields_reported_together() {
        let (store, project_id) = setup().await;
        let service = CreateExpenseService::new(store.clone())
            .with_policy(PhotoPolicy::new(16))
            .with_today(today());

        let mut p = params(project_id, "0");
        p.concept = None;
        let result = service
            .call(NewExpenseRequest {
                params: p,
                photo: Some(jpeg(17)),
            })
            .await
            .unwrap();

        assert_eq!(
            result.errors.full_messages(),
            vec![
                "Concept can't be blank",
                "Amount must be greater than 0",
                "Photo is too large (maximum is 16 bytes)",
            ]
        );
        assert!(store.list_expenses_on(today()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_image_rejected() {
        let (store, project_id) = setup().await;
        let service = CreateExpenseService::new(store).with_today(today());

        let result = service
            .call(NewExpenseRequest {
                params: params(project_id, "10"),
                photo: Some(PhotoUpload {
                    filename: "factura.pdf".into(),
                    content_type: Some("application/pdf".into()),
                    data: Bytes::from_static(b"%PDF"),
                }),
            })
            .await
            .unwrap();

        assert!(result.errors.has_error("photo"));
    }

    #[tokio::test]
    async fn test_unknown_project_is_rejected() {
        let (store, _) = setup().await;
        let service = CreateExpenseService::new(store).with_today(today());

        let result = service
            .call(NewExpenseRequest {
                params: params(999, "10"),
                photo: None,
            })
            .await
            .unwrap();

        assert_eq!(result.errors.full_messages(), vec!["Project does not exist"]);
    }

    #[tokio::test]
    async fn test_project_checked_only_after_form_is_valid() {
        let (store, _) = setup().await;
        let service = CreateExpenseService::new(store).with_today(today());

        let result = service
            .call(NewExpenseRequest {
                params: params(999, "0"),
                photo: None,
            })
            .await
            .unwrap();

        assert_eq!(result.errors.full_messages(), vec!["Amount must be greater than 0"]);
    }
}
