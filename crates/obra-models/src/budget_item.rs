//! Budget item model ("partida")
//!
//! Table: budget_items

use chrono::{DateTime, Utc};
use obra_core::traits::{Entity, Id, Identifiable, ProjectScoped};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One budgeted line of a project: quantity × unit price.
///
/// `quantity` and `unit_price` are nullable in storage for rows written by
/// older schemas; both count as zero in every computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: Id,
    pub project_id: Id,

    /// Item code from the bill of quantities, e.g. "A-01"
    pub item_code: String,

    pub description: String,

    /// Unit of measure (m2, m3, pza, ...)
    pub unit: Option<String>,

    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl BudgetItem {
    pub fn quantity_or_zero(&self) -> Decimal {
        self.quantity.unwrap_or_default()
    }

    pub fn unit_price_or_zero(&self) -> Decimal {
        self.unit_price.unwrap_or_default()
    }

    /// quantity × unit price, missing values as zero
    pub fn line_value(&self) -> Decimal {
        self.quantity_or_zero()
            .saturating_mul(self.unit_price_or_zero())
    }
}

impl Identifiable for BudgetItem {
    fn id(&self) -> Id {
        self.id
    }
}

impl ProjectScoped for BudgetItem {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for BudgetItem {
    const TYPE_NAME: &'static str = "BudgetItem";
}

/// Insert DTO for a budget item
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewBudgetItem {
    pub project_id: Id,

    #[validate(length(min = 1, max = 50))]
    pub item_code: String,

    #[validate(length(min = 1, max = 250))]
    pub description: String,

    #[validate(length(max = 30))]
    pub unit: Option<String>,

    pub quantity: Decimal,
    pub unit_price: Decimal,
}
