//! HAL+JSON representers
//!
//! Turn models and computed figures into the documents served by the handlers.

pub mod budget_item;
pub mod expense;
pub mod hal;
pub mod project;
pub mod summary;

pub use budget_item::BudgetItemRepresenter;
pub use expense::ExpenseRepresenter;
pub use hal::{HalCollection, HalLink, HalLinks, HalResource};
pub use project::ProjectRepresenter;
pub use summary::SummaryRepresenter;
