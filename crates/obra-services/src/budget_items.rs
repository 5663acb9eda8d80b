//! Create service for budget items

use std::sync::Arc;

use async_trait::async_trait;
use obra_contracts::{BudgetItemParams, Contract, CreateBudgetItemContract};
use obra_core::result::{ObraResult, ServiceResult};
use obra_core::traits::Id;
use obra_db::Store;
use obra_models::BudgetItem;
use tracing::{info, instrument};

use crate::base::{inserted, missing_project, Callable};

/// Budget item form submitted for a project
#[derive(Debug, Clone)]
pub struct NewBudgetItemRequest {
    pub project_id: Id,
    pub params: BudgetItemParams,
}

/// Service for creating budget items
pub struct CreateBudgetItemService {
    store: Arc<dyn Store>,
}

impl CreateBudgetItemService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Callable<NewBudgetItemRequest, BudgetItem> for CreateBudgetItemService {
    #[instrument(skip(self, request), fields(project_id = request.project_id))]
    async fn call(&self, request: NewBudgetItemRequest) -> ObraResult<ServiceResult<BudgetItem>> {
        let contract = CreateBudgetItemContract::new(request.project_id);
        let item = match contract.validate(&request.params) {
            Ok(item) => item,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };

        if !self.store.project_exists(item.project_id).await? {
            return Ok(ServiceResult::failure(missing_project()));
        }

        let result = inserted(self.store.create_budget_item(item).await)?;
        if let Some(item) = &result.result {
            info!(id = item.id, code = %item.item_code, "Budget item created");
        }
        Ok(result)
    }
}
