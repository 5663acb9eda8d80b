//! In-memory store for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use obra_core::traits::{Entity, Id, Identifiable};
use obra_models::{
    BudgetItem, Expense, ExpensePhoto, NewBudgetItem, NewExpense, NewPhoto, NewProject, Project,
};
use tokio::sync::RwLock;

use crate::repository::{RepositoryError, RepositoryResult};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    next_id: Id,
    projects: Vec<Project>,
    budget_items: Vec<BudgetItem>,
    expenses: Vec<Expense>,
    photos: HashMap<Id, ExpensePhoto>,
}

impl Tables {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn has_project(&self, id: Id) -> bool {
        find_row(&self.projects, id).is_some()
    }
}

fn find_row<T: Identifiable + Clone>(rows: &[T], id: Id) -> Option<T> {
    rows.iter().find(|row| row.id() == id).cloned()
}

/// Store keeping all rows in memory; foreign keys are enforced like the
/// database does.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Make `ping` fail, as a lost database connection would
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_project(&self, project: NewProject) -> RepositoryResult<Project> {
        let mut tables = self.tables.write().await;
        let row = Project {
            id: tables.next_id(),
            name: project.name,
            location: project.location,
            client: project.client,
            created_at: Utc::now(),
        };
        tables.projects.push(row.clone());
        Ok(row)
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        let mut projects = self.tables.read().await.projects.clone();
        newest_first(&mut projects, |p| (p.created_at, p.id));
        Ok(projects)
    }

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(find_row(&tables.projects, id))
    }

    async fn create_budget_item(&self, item: NewBudgetItem) -> RepositoryResult<BudgetItem> {
        let mut tables = self.tables.write().await;
        if !tables.has_project(item.project_id) {
            return Err(RepositoryError::MissingReference(Project::TYPE_NAME));
        }
        let row = BudgetItem {
            id: tables.next_id(),
            project_id: item.project_id,
            item_code: item.item_code,
            description: item.description,
            unit: item.unit,
            quantity: Some(item.quantity),
            unit_price: Some(item.unit_price),
            created_at: Utc::now(),
        };
        tables.budget_items.push(row.clone());
        Ok(row)
    }

    async fn list_budget_items_for_project(
        &self,
        project_id: Id,
    ) -> RepositoryResult<Vec<BudgetItem>> {
        let tables = self.tables.read().await;
        Ok(tables
            .budget_items
            .iter()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_expense(&self, expense: NewExpense) -> RepositoryResult<Expense> {
        let mut tables = self.tables.write().await;
        if !tables.has_project(expense.project_id) {
            return Err(RepositoryError::MissingReference(Project::TYPE_NAME));
        }

        let id = tables.next_id();
        let mut row = Expense {
            id,
            project_id: expense.project_id,
            spent_on: expense.spent_on,
            concept: expense.concept,
            amount: Some(expense.amount),
            category: expense.category,
            photo_name: None,
            photo_mime: None,
            photo_url: None,
            photo_ref: None,
            has_photo_blob: false,
            created_at: Utc::now(),
        };

        match expense.photo {
            Some(NewPhoto::Blob { filename, mime, data }) => {
                row.photo_name = Some(filename.clone());
                row.photo_mime = Some(mime.clone());
                row.has_photo_blob = true;
                tables.photos.insert(
                    id,
                    ExpensePhoto {
                        photo_name: Some(filename),
                        photo_mime: mime,
                        photo_bytes: data,
                    },
                );
            }
            Some(NewPhoto::Hosted { filename, mime, url, reference }) => {
                row.photo_name = Some(filename);
                row.photo_mime = Some(mime);
                row.photo_url = Some(url);
                row.photo_ref = Some(reference);
            }
            None => {}
        }

        tables.expenses.push(row.clone());
        Ok(row)
    }

    async fn find_expense(&self, id: Id) -> RepositoryResult<Option<Expense>> {
        let tables = self.tables.read().await;
        Ok(find_row(&tables.expenses, id))
    }

    async fn list_expenses_for_project(&self, project_id: Id) -> RepositoryResult<Vec<Expense>> {
        let tables = self.tables.read().await;
        let mut expenses: Vec<_> = tables
            .expenses
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();
        newest_first(&mut expenses, |e| (e.spent_on, e.created_at, e.id));
        Ok(expenses)
    }

    async fn list_expenses_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Expense>> {
        let tables = self.tables.read().await;
        let mut expenses: Vec<_> = tables
            .expenses
            .iter()
            .filter(|e| e.spent_on == date)
            .cloned()
            .collect();
        newest_first(&mut expenses, |e| (e.created_at, e.id));
        Ok(expenses)
    }

    async fn find_expense_photo(&self, id: Id) -> RepositoryResult<Option<ExpensePhoto>> {
        let tables = self.tables.read().await;
        Ok(tables.photos.get(&id).cloned())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
