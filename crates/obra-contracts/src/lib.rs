//! # obra-contracts
//!
//! Contract validation for the obra budget tracker.
//!
//! Contracts take the raw fields of a submitted form and produce the insert
//! DTO from `obra-models`, or every validation problem found in one pass.

pub mod base;
pub mod budget_items;
pub mod expenses;
pub mod projects;

pub use base::*;
pub use budget_items::{BudgetItemParams, CreateBudgetItemContract};
pub use expenses::{CreateExpenseContract, ExpenseParams};
pub use projects::{CreateProjectContract, ProjectParams};
