//! Storage seam used by the services and the web layer
//!
//! [`Store`] gathers the explicit queries the application needs. `PgStore`
//! answers them from PostgreSQL; [`crate::memory::MemoryStore`] keeps
//! everything in memory for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use obra_core::traits::Id;
use obra_models::{
    BudgetItem, Expense, ExpensePhoto, NewBudgetItem, NewExpense, NewProject, Project,
};
use tracing::debug;

use crate::budget_items::BudgetItemRepository;
use crate::expenses::ExpenseRepository;
use crate::pool::Database;
use crate::projects::ProjectRepository;
use crate::repository::{Repository, RepositoryResult};

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_project(&self, project: NewProject) -> RepositoryResult<Project>;

    /// All projects, newest first
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>>;

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>>;

    async fn project_exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.find_project(id).await?.is_some())
    }

    async fn create_budget_item(&self, item: NewBudgetItem) -> RepositoryResult<BudgetItem>;

    async fn list_budget_items_for_project(&self, project_id: Id)
        -> RepositoryResult<Vec<BudgetItem>>;

    async fn create_expense(&self, expense: NewExpense) -> RepositoryResult<Expense>;

    async fn find_expense(&self, id: Id) -> RepositoryResult<Option<Expense>>;

    async fn list_expenses_for_project(&self, project_id: Id) -> RepositoryResult<Vec<Expense>>;

    /// Expenses of every project incurred on `date`, newest entry first
    async fn list_expenses_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Expense>>;

    /// Photo blob of an expense; `None` when the expense has no stored blob
    async fn find_expense_photo(&self, id: Id) -> RepositoryResult<Option<ExpensePhoto>>;

    /// Check the backend is reachable
    async fn ping(&self) -> RepositoryResult<()>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    db: Database,
    projects: ProjectRepository,
    budget_items: BudgetItemRepository,
    expenses: ExpenseRepository,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        let pool = db.pool().clone();
        Self {
            projects: ProjectRepository::new(pool.clone()),
            budget_items: BudgetItemRepository::new(pool.clone()),
            expenses: ExpenseRepository::new(pool),
            db,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_project(&self, project: NewProject) -> RepositoryResult<Project> {
        self.projects.create(project).await
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        let projects = self.projects.find_all_newest_first().await?;
        debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>> {
        self.projects.find_by_id(id).await
    }

    async fn project_exists(&self, id: Id) -> RepositoryResult<bool> {
        self.projects.exists(id).await
    }

    async fn create_budget_item(&self, item: NewBudgetItem) -> RepositoryResult<BudgetItem> {
        self.budget_items.create(item).await
    }

    async fn list_budget_items_for_project(
        &self,
        project_id: Id,
    ) -> RepositoryResult<Vec<BudgetItem>> {
        self.budget_items.find_for_project(project_id).await
    }

    async fn create_expense(&self, expense: NewExpense) -> RepositoryResult<Expense> {
        self.expenses.create(expense).await
    }

    async fn find_expense(&self, id: Id) -> RepositoryResult<Option<Expense>> {
        self.expenses.find_by_id(id).await
    }

    async fn list_expenses_for_project(&self, project_id: Id) -> RepositoryResult<Vec<Expense>> {
        self.expenses.find_for_project(project_id).await
    }

    async fn list_expenses_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Expense>> {
        let expenses = self.expenses.find_on(date).await?;
        debug!(%date, count = expenses.len(), "Listed expenses for day");
        Ok(expenses)
    }

    async fn find_expense_photo(&self, id: Id) -> RepositoryResult<Option<ExpensePhoto>> {
        self.expenses.find_photo(id).await
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.db.ping().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
