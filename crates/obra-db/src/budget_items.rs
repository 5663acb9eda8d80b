//! Budget item repository

use async_trait::async_trait;
use obra_core::traits::Id;
use obra_models::{BudgetItem, Entity, NewBudgetItem, Project};
use sqlx::PgPool;

use crate::repository::{insert_error, Repository, RepositoryResult};

const COLUMNS: &str =
    "id, project_id, item_code, description, unit, quantity, unit_price, created_at";

/// Budget item repository implementation
#[derive(Clone)]
pub struct BudgetItemRepository {
    pool: PgPool,
}

impl BudgetItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Items of one project, in the order they were entered
    pub async fn find_for_project(&self, project_id: Id) -> RepositoryResult<Vec<BudgetItem>> {
        let rows = sqlx::query_as::<_, BudgetItem>(&format!(
            "SELECT {COLUMNS} FROM budget_items WHERE project_id = $1 ORDER BY id ASC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<BudgetItem, NewBudgetItem> for BudgetItemRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<BudgetItem>> {
        let row = sqlx::query_as::<_, BudgetItem>(&format!(
            "SELECT {COLUMNS} FROM budget_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, dto: NewBudgetItem) -> RepositoryResult<BudgetItem> {
        let row = sqlx::query_as::<_, BudgetItem>(&format!(
            r#"
            INSERT INTO budget_items
                (project_id, item_code, description, unit, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.project_id)
        .bind(&dto.item_code)
        .bind(&dto.description)
        .bind(&dto.unit)
        .bind(dto.quantity)
        .bind(dto.unit_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, Project::TYPE_NAME))?;

        Ok(row)
    }
}
