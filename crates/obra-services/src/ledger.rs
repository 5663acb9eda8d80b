//! Daily expense ledger ("gastos por día")

use chrono::NaiveDate;
use obra_core::result::ObraResult;
use obra_core::traits::{Id, ProjectScoped};
use obra_db::Store;
use obra_models::Expense;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::summary::saturating_sum;

/// Expenses of one day, optionally narrowed to one project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLedger {
    pub date: NaiveDate,
    pub project_id: Option<Id>,
    pub expenses: Vec<Expense>,
    /// Sum of the listed amounts
    pub day_total: Decimal,
}

/// Keep the expenses incurred on `date` (and in `project_id`, when given).
/// Input order is preserved.
pub fn filter_expenses_by_date_and_project(
    expenses: impl IntoIterator<Item = Expense>,
    date: NaiveDate,
    project_id: Option<Id>,
) -> DailyLedger {
    let expenses: Vec<Expense> = expenses
        .into_iter()
        .filter(|e| e.spent_on == date)
        .filter(|e| project_id.map_or(true, |id| e.belongs_to(id)))
        .collect();
    let day_total = saturating_sum(expenses.iter().map(Expense::amount_or_zero));

    DailyLedger {
        date,
        project_id,
        expenses,
        day_total,
    }
}

/// Load the ledger for a day from the store
#[instrument(skip(store))]
pub async fn load_daily_ledger(
    store: &dyn Store,
    date: NaiveDate,
    project_id: Option<Id>,
) -> ObraResult<DailyLedger> {
    let expenses = store.list_expenses_on(date).await?;
    Ok(filter_expenses_by_date_and_project(expenses, date, project_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use obra_db::MemoryStore;
    use obra_models::{NewExpense, NewProject};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn expense(id: Id, project_id: Id, spent_on: NaiveDate, amount: Option<Decimal>) -> Expense {
        Expense {
            id,
            project_id,
            spent_on,
            concept: "Gasto".into(),
            amount,
            category: None,
            photo_name: None,
            photo_mime: None,
            photo_url: None,
            photo_ref: None,
            has_photo_blob: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filters_by_date() {
        let ledger = filter_expenses_by_date_and_project(
            vec![
                expense(1, 1, day(2), Some(dec!(200))),
                expense(2, 1, day(3), Some(dec!(999))),
                expense(3, 2, day(2), Some(dec!(300))),
            ],
            day(2),
            None,
        );

        assert_eq!(ledger.expenses.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(ledger.expenses.iter().all(|e| e.spent_on == day(2)));
        assert_eq!(ledger.day_total, dec!(500));
    }

    #[test]
    fn test_filters_by_project() {
        let ledger = filter_expenses_by_date_and_project(
            vec![
                expense(1, 1, day(2), Some(dec!(200))),
                expense(2, 2, day(2), Some(dec!(300))),
                expense(3, 1, day(2), None),
            ],
            day(2),
            Some(1),
        );

        assert_eq!(ledger.expenses.len(), 2);
        assert_eq!(ledger.day_total, dec!(200));
        assert_eq!(ledger.project_id, Some(1));
    }

    #[test]
    fn test_day_total_saturates() {
        let ledger = filter_expenses_by_date_and_project(
            vec![
                expense(1, 1, day(2), Some(Decimal::MAX)),
                expense(2, 1, day(2), Some(Decimal::MAX)),
            ],
            day(2),
            None,
        );
        assert_eq!(ledger.day_total, Decimal::MAX);
    }

    #[test]
    fn test_empty_day() {
        let ledger = filter_expenses_by_date_and_project(Vec::new(), day(9), None);
        assert!(ledger.expenses.is_empty());
        assert_eq!(ledger.day_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_load_from_store() {
        let store = MemoryStore::new();
        let project = store.create_project(NewProject::new("Casa A")).await.unwrap();
        for amount in [dec!(200), dec!(300)] {
            store
                .create_expense(NewExpense {
                    project_id: project.id,
                    spent_on: day(2),
                    concept: "Cemento".into(),
                    amount,
                    category: None,
                    photo: None,
                })
                .await
                .unwrap();
        }

        let ledger = load_daily_ledger(&store, day(2), Some(project.id)).await.unwrap();
        assert_eq!(ledger.day_total, dec!(500));
        assert_eq!(ledger.expenses.len(), 2);
    }
}
