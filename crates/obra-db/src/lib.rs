//! # obra-db
//!
//! Database layer for the obra budget tracker.
//!
//! - Connection pool management
//! - Schema bootstrap (no migration step)
//! - Insert-only repositories for projects, budget items and expenses
//! - The [`Store`] seam, backed by PostgreSQL or by memory
//!
//! ## Example
//!
//! ```ignore
//! use obra_db::{Database, DatabaseConfig, PgStore, Store};
//!
//! let db = Database::connect(&DatabaseConfig::from(&config.database)).await?;
//! obra_db::schema::ensure_schema(db.pool()).await?;
//!
//! let store = PgStore::new(db);
//! let projects = store.list_projects().await?;
//! ```

pub mod budget_items;
pub mod expenses;
pub mod memory;
pub mod pool;
pub mod projects;
pub mod repository;
pub mod schema;
pub mod store;

// Re-exports
pub use budget_items::BudgetItemRepository;
pub use expenses::ExpenseRepository;
pub use memory::MemoryStore;
pub use pool::{Database, DatabaseConfig};
pub use projects::ProjectRepository;
pub use repository::{Repository, RepositoryError, RepositoryResult};
pub use store::{PgStore, Store};
