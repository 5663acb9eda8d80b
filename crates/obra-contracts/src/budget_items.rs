//! Create contract for budget items

use obra_core::error::ValidationErrors;
use obra_core::traits::Id;
use obra_models::NewBudgetItem;
use serde::Deserialize;
use validator::Validate;

use crate::base::{
    merge_length_errors, non_negative_or_zero, present_owned, require_text, Contract,
    ValidationResult,
};

/// Scale kept for quantities (NUMERIC(16,3))
pub const QUANTITY_SCALE: u32 = 3;
/// Scale kept for prices (NUMERIC(16,2))
pub const PRICE_SCALE: u32 = 2;

/// Raw budget item form; the project comes from the route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetItemParams {
    pub item_code: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

/// Contract for creating a budget item in a given project
#[derive(Debug)]
pub struct CreateBudgetItemContract {
    project_id: Id,
}

impl CreateBudgetItemContract {
    pub fn new(project_id: Id) -> Self {
        Self { project_id }
    }
}

impl Contract<BudgetItemParams> for CreateBudgetItemContract {
    type Output = NewBudgetItem;

    fn validate(&self, params: &BudgetItemParams) -> ValidationResult<NewBudgetItem> {
        let mut errors = ValidationErrors::new();

        let item = NewBudgetItem {
            project_id: self.project_id,
            item_code: require_text("item_code", params.item_code.as_deref(), &mut errors),
            description: require_text("description", params.description.as_deref(), &mut errors),
            unit: present_owned(params.unit.as_deref()),
            quantity: non_negative_or_zero(
                "quantity",
                params.quantity.as_deref(),
                QUANTITY_SCALE,
                &mut errors,
            ),
            unit_price: non_negative_or_zero(
                "unit_price",
                params.unit_price.as_deref(),
                PRICE_SCALE,
                &mut errors,
            ),
        };
        merge_length_errors(item.validate(), &mut errors);

        errors.into_result().map(|_| item)
    }
}
