//! # obra-services
//!
//! Business logic for the obra budget tracker.
//!
//! - [`summary`]: budget vs. actual figures per project and for the portfolio
//! - [`ledger`]: the daily expense ledger
//! - create services for projects, budget items and expenses

pub mod base;
pub mod budget_items;
pub mod expenses;
pub mod ledger;
pub mod projects;
pub mod summary;

pub use base::Callable;
pub use budget_items::{CreateBudgetItemService, NewBudgetItemRequest};
pub use expenses::{CreateExpenseService, CreatedExpense, NewExpenseRequest};
pub use ledger::{filter_expenses_by_date_and_project, load_daily_ledger, DailyLedger};
pub use projects::CreateProjectService;
pub use summary::{
    compute_portfolio_summary, compute_project_summary, load_portfolio_summary,
    load_project_ledger, PortfolioSummary, ProjectLedger, ProjectSummary,
};
