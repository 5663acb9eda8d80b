//! Expense repository
//!
//! The photo blob is only read by [`ExpenseRepository::find_photo`]; every
//! other query reports whether one exists.

use async_trait::async_trait;
use chrono::NaiveDate;
use obra_core::traits::Id;
use obra_models::{Entity, Expense, ExpensePhoto, NewExpense, Project};
use sqlx::PgPool;

use crate::repository::{insert_error, Repository, RepositoryResult};

const COLUMNS: &str = r#"id, project_id, spent_on, concept, amount, category,
    photo_name, photo_mime, photo_url, photo_ref,
    (photo_bytes IS NOT NULL) AS has_photo_blob, created_at"#;

/// Expense repository implementation
#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Expenses of one project, most recent day first
    pub async fn find_for_project(&self, project_id: Id) -> RepositoryResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {COLUMNS} FROM expenses
            WHERE project_id = $1
            ORDER BY spent_on DESC, created_at DESC, id DESC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Expenses incurred on one day, newest entry first
    pub async fn find_on(&self, date: NaiveDate) -> RepositoryResult<Vec<Expense>> {
        let rows = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {COLUMNS} FROM expenses
            WHERE spent_on = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// The stored photo blob of an expense, if there is one
    pub async fn find_photo(&self, id: Id) -> RepositoryResult<Option<ExpensePhoto>> {
        let row = sqlx::query_as::<_, ExpensePhoto>(
            r#"
            SELECT photo_name, photo_mime, photo_bytes FROM expenses
            WHERE id = $1 AND photo_bytes IS NOT NULL AND photo_mime IS NOT NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl Repository<Expense, NewExpense> for ExpenseRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Expense>> {
        let row = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, dto: NewExpense) -> RepositoryResult<Expense> {
        let photo = dto.photo.as_ref();

        let row = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses
                (project_id, spent_on, concept, amount, category,
                 photo_name, photo_mime, photo_bytes, photo_url, photo_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(dto.project_id)
        .bind(dto.spent_on)
        .bind(&dto.concept)
        .bind(dto.amount)
        .bind(&dto.category)
        .bind(photo.map(|p| p.filename()))
        .bind(photo.map(|p| p.mime()))
        .bind(photo.and_then(|p| p.blob()))
        .bind(photo.and_then(|p| p.url()))
        .bind(photo.and_then(|p| p.reference()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, Project::TYPE_NAME))?;

        Ok(row)
    }
}
