//! Budget vs. actual aggregation
//!
//! Pure functions over rows already loaded from storage, plus thin loaders
//! that fetch those rows through a [`Store`].

use obra_core::result::ObraResult;
use obra_core::traits::Id;
use obra_db::Store;
use obra_models::{BudgetItem, Expense, Project};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A project together with its budget items and expenses
#[derive(Debug, Clone)]
pub struct ProjectLedger {
    pub project: Project,
    pub items: Vec<BudgetItem>,
    pub expenses: Vec<Expense>,
}

/// Budgeted vs. spent figures of one project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: Id,
    pub name: String,
    pub budget_total: Decimal,
    pub spent_total: Decimal,
    /// Positive while under budget
    pub variance: Decimal,
    pub percent_utilized: Decimal,
}

/// Per-project rows plus grand totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub projects: Vec<ProjectSummary>,
    pub budget_total: Decimal,
    pub spent_total: Decimal,
    pub variance: Decimal,
    pub percent_utilized: Decimal,
}

/// Sum that clamps at `Decimal::MAX` / `Decimal::MIN` instead of overflowing
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// Σ quantity × unit price, missing values as zero
pub fn budget_total(items: &[BudgetItem]) -> Decimal {
    saturating_sum(items.iter().map(BudgetItem::line_value))
}

/// Σ amount, missing values as zero
pub fn spent_total(expenses: &[Expense]) -> Decimal {
    saturating_sum(expenses.iter().map(Expense::amount_or_zero))
}

/// spent / budget × 100, or zero when nothing is budgeted
pub fn percent_utilized(budget: Decimal, spent: Decimal) -> Decimal {
    if budget <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    spent
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
}

pub fn compute_project_summary(ledger: &ProjectLedger) -> ProjectSummary {
    let budget = budget_total(&ledger.items);
    let spent = spent_total(&ledger.expenses);

    ProjectSummary {
        project_id: ledger.project.id,
        name: ledger.project.name.clone(),
        budget_total: budget,
        spent_total: spent,
        variance: budget.saturating_sub(spent),
        percent_utilized: percent_utilized(budget, spent),
    }
}

pub fn compute_portfolio_summary(ledgers: &[ProjectLedger]) -> PortfolioSummary {
    let projects: Vec<ProjectSummary> = ledgers.iter().map(compute_project_summary).collect();
    let budget = saturating_sum(projects.iter().map(|p| p.budget_total));
    let spent = saturating_sum(projects.iter().map(|p| p.spent_total));

    PortfolioSummary {
        projects,
        budget_total: budget,
        spent_total: spent,
        variance: budget.saturating_sub(spent),
        percent_utilized: percent_utilized(budget, spent),
    }
}

/// Load the items and expenses of one project
pub async fn load_project_ledger(store: &dyn Store, project: Project) -> ObraResult<ProjectLedger> {
    let items = store.list_budget_items_for_project(project.id).await?;
    let expenses = store.list_expenses_for_project(project.id).await?;
    Ok(ProjectLedger {
        project,
        items,
        expenses,
    })
}

/// Summary of every project, newest project first
#[instrument(skip(store), fields(store = store.name()))]
pub async fn load_portfolio_summary(store: &dyn Store) -> ObraResult<PortfolioSummary> {
    let projects = store.list_projects().await?;
    let mut ledgers = Vec::with_capacity(projects.len());
    for project in projects {
        ledgers.push(load_project_ledger(store, project).await?);
    }

    let summary = compute_portfolio_summary(&ledgers);
    debug!(projects = ledgers.len(), "Portfolio summary computed");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn project(id: Id, name: &str) -> Project {
        Project {
            id,
            name: name.into(),
            location: None,
            client: None,
            created_at: Utc::now(),
        }
    }

    fn item(project_id: Id, quantity: Option<Decimal>, unit_price: Option<Decimal>) -> BudgetItem {
        BudgetItem {
            id: 0,
            project_id,
            item_code: "A-01".into(),
            description: "Partida".into(),
            unit: None,
            quantity,
            unit_price,
            created_at: Utc::now(),
        }
    }

    fn expense(project_id: Id, amount: Option<Decimal>) -> Expense {
        Expense {
            id: 0,
            project_id,
            spent_on: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
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
    fn test_casa_a_scenario() {
        let ledger = ProjectLedger {
            project: project(1, "Casa A"),
            items: vec![item(1, Some(dec!(10)), Some(dec!(100)))],
            expenses: vec![expense(1, Some(dec!(200))), expense(1, Some(dec!(300)))],
        };
        let summary = compute_project_summary(&ledger);

        assert_eq!(summary.budget_total, dec!(1000));
        assert_eq!(summary.spent_total, dec!(500));
        assert_eq!(summary.variance, dec!(500));
        assert_eq!(summary.percent_utilized, dec!(50.0));
    }

    #[test]
    fn test_no_budget_means_zero_percent() {
        let ledger = ProjectLedger {
            project: project(2, "Bodega"),
            items: vec![],
            expenses: vec![expense(2, Some(dec!(50)))],
        };
        let summary = compute_project_summary(&ledger);

        assert_eq!(summary.budget_total, Decimal::ZERO);
        assert_eq!(summary.percent_utilized, Decimal::ZERO);
        assert_eq!(summary.variance, dec!(-50));
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let items = vec![
            item(1, None, Some(dec!(100))),
            item(1, Some(dec!(2)), None),
            item(1, Some(dec!(2.5)), Some(dec!(40))),
        ];
        assert_eq!(budget_total(&items), dec!(100));
        assert_eq!(budget_total(&[]), Decimal::ZERO);
        assert_eq!(spent_total(&[expense(1, None), expense(1, Some(dec!(7)))]), dec!(7));
    }

    #[test]
    fn test_overspent_project() {
        let ledger = ProjectLedger {
            project: project(3, "Local"),
            items: vec![item(3, Some(dec!(1)), Some(dec!(400)))],
            expenses: vec![expense(3, Some(dec!(500)))],
        };
        let summary = compute_project_summary(&ledger);
        assert_eq!(summary.variance, dec!(-100));
        assert_eq!(summary.percent_utilized, dec!(125));
    }

    #[test]
    fn test_portfolio_totals() {
        let ledgers = vec![
            ProjectLedger {
                project: project(1, "Casa A"),
                items: vec![item(1, Some(dec!(10)), Some(dec!(100)))],
                expenses: vec![expense(1, Some(dec!(500)))],
            },
            ProjectLedger {
                project: project(2, "Bodega"),
                items: vec![],
                expenses: vec![expense(2, Some(dec!(50)))],
            },
        ];
        let portfolio = compute_portfolio_summary(&ledgers);

        assert_eq!(portfolio.projects.len(), 2);
        assert_eq!(portfolio.budget_total, dec!(1000));
        assert_eq!(portfolio.spent_total, dec!(550));
        assert_eq!(portfolio.variance, dec!(450));
        assert_eq!(portfolio.percent_utilized, dec!(55));
    }

    #[test]
    fn test_budget_total_saturates_on_huge_ledgers() {
        let max = dec!(1_000_000_000_000);
        let items: Vec<BudgetItem> = (0..80_000).map(|_| item(1, Some(max), Some(max))).collect();
        assert_eq!(budget_total(&items), Decimal::MAX);

        let expenses: Vec<Expense> = (0..3).map(|_| expense(1, Some(Decimal::MAX))).collect();
        assert_eq!(spent_total(&expenses), Decimal::MAX);
    }

    #[test]
    fn test_portfolio_totals_saturate() {
        let ledgers: Vec<ProjectLedger> = (1..=2)
            .map(|id| ProjectLedger {
                project: project(id, "Torre"),
                items: vec![item(id, Some(Decimal::MAX), Some(Decimal::ONE))],
                expenses: vec![expense(id, Some(Decimal::MAX))],
            })
            .collect();
        let portfolio = compute_portfolio_summary(&ledgers);

        assert_eq!(portfolio.budget_total, Decimal::MAX);
        assert_eq!(portfolio.spent_total, Decimal::MAX);
        assert_eq!(portfolio.variance, Decimal::ZERO);
        assert_eq!(portfolio.percent_utilized, dec!(100));
    }

    #[test]
    fn test_empty_portfolio() {
        let portfolio = compute_portfolio_summary(&[]);
        assert!(portfolio.projects.is_empty());
        assert_eq!(portfolio.percent_utilized, Decimal::ZERO);
        assert_eq!(portfolio.variance, Decimal::ZERO);
    }
}
