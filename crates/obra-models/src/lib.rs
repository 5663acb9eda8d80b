//! # obra-models
//!
//! Domain models for the obra budget tracker.
//!
//! Each model maps to one table and implements the core traits from `obra-core`.
//! Relationships are plain foreign-key fields; loading related rows is the job
//! of explicit repository queries.

pub use obra_core::traits::{Entity, Id, Identifiable, ProjectScoped};

pub mod budget_item;
pub mod expense;
pub mod project;

pub use budget_item::{BudgetItem, NewBudgetItem};
pub use expense::{Expense, ExpensePhoto, NewExpense, NewPhoto, PhotoLocation};
pub use project::{NewProject, Project};
