//! Create contract for expenses

use chrono::NaiveDate;
use obra_core::error::ValidationErrors;
use obra_models::NewExpense;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::base::{
    exceeds_scale, merge_length_errors, parse_date, parse_decimal, parse_id, present,
    present_owned, require_text, scale_message, Contract, ValidationResult, MAX_NUMERIC,
};

/// Scale kept for amounts (NUMERIC(16,2))
pub const AMOUNT_SCALE: u32 = 2;

/// Raw expense form fields; the photo travels separately
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseParams {
    pub project_id: Option<String>,
    pub date: Option<String>,
    pub concept: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
}

/// Contract for creating an expense.
///
/// A blank date means `today`; a date that does not parse is rejected.
#[derive(Debug)]
pub struct CreateExpenseContract {
    today: NaiveDate,
}

impl CreateExpenseContract {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    fn validate_amount(&self, raw: Option<&str>, errors: &mut ValidationErrors) -> Decimal {
        match present(raw).and_then(parse_decimal) {
            Some(v) if exceeds_scale(v, AMOUNT_SCALE) => {
                errors.add("amount", scale_message(AMOUNT_SCALE));
                Decimal::ZERO
            }
            Some(v) if v > MAX_NUMERIC => {
                errors.add("amount", "is too large");
                Decimal::ZERO
            }
            Some(v) if v > Decimal::ZERO => v,
            _ => {
                errors.add("amount", "must be greater than 0");
                Decimal::ZERO
            }
        }
    }

    fn validate_date(&self, raw: Option<&str>, errors: &mut ValidationErrors) -> NaiveDate {
        match present(raw) {
            None => self.today,
            Some(raw) => parse_date(raw).unwrap_or_else(|| {
                errors.add("date", "is not a valid date");
                self.today
            }),
        }
    }
}

impl Contract<ExpenseParams> for CreateExpenseContract {
    type Output = NewExpense;

    fn validate(&self, params: &ExpenseParams) -> ValidationResult<NewExpense> {
        let mut errors = ValidationErrors::new();

        let project_id = params
            .project_id
            .as_deref()
            .and_then(parse_id)
            .unwrap_or_else(|| {
                errors.add("project_id", "must be selected");
                0
            });

        let expense = NewExpense {
            project_id,
            spent_on: self.validate_date(params.date.as_deref(), &mut errors),
            concept: require_text("concept", params.concept.as_deref(), &mut errors),
            amount: self.validate_amount(params.amount.as_deref(), &mut errors),
            category: present_owned(params.category.as_deref()),
            photo: None,
        };
        merge_length_errors(expense.validate(), &mut errors);

        errors.into_result().map(|_| expense)
    }
}
