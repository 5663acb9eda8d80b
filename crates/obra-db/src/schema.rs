//! Schema bootstrap
//!
//! There is no migration step: tables are created when missing, and columns
//! added after the first release are appended with `ADD COLUMN IF NOT EXISTS`
//! so databases created by older builds keep working.

use sqlx::PgPool;
use tracing::{debug, info};

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id          BIGSERIAL PRIMARY KEY,
        name        VARCHAR(120) NOT NULL,
        location    VARCHAR(200),
        client      VARCHAR(120),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budget_items (
        id          BIGSERIAL PRIMARY KEY,
        project_id  BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        item_code   VARCHAR(50) NOT NULL,
        description VARCHAR(250) NOT NULL,
        unit        VARCHAR(30),
        quantity    NUMERIC(16, 3) DEFAULT 0,
        unit_price  NUMERIC(16, 2) DEFAULT 0,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id          BIGSERIAL PRIMARY KEY,
        project_id  BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        spent_on    DATE NOT NULL DEFAULT CURRENT_DATE,
        concept     VARCHAR(250) NOT NULL,
        amount      NUMERIC(16, 2) NOT NULL DEFAULT 0,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Columns added to `expenses` after the table first shipped
const EXPENSE_COLUMNS: &[(&str, &str)] = &[
    ("category", "VARCHAR(80)"),
    ("photo_name", "VARCHAR(200)"),
    ("photo_mime", "VARCHAR(80)"),
    ("photo_bytes", "BYTEA"),
    ("photo_url", "TEXT"),
    ("photo_ref", "VARCHAR(255)"),
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_budget_items_project_id ON budget_items (project_id)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_project_id ON expenses (project_id)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_spent_on ON expenses (spent_on)",
];

/// Create missing tables, columns and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    ensure_expense_columns(pool).await?;
    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema ready");
    Ok(())
}

/// Add the category and photo columns to an `expenses` table that predates them
pub async fn ensure_expense_columns(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in expense_column_statements() {
        debug!(sql = %statement, "Ensuring column");
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}

fn expense_column_statements() -> Vec<String> {
    EXPENSE_COLUMNS
        .iter()
        .map(|(name, ty)| format!("ALTER TABLE expenses ADD COLUMN IF NOT EXISTS {} {}", name, ty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_column_statements() {
        let statements = expense_column_statements();
        assert_eq!(statements.len(), EXPENSE_COLUMNS.len());
        assert_eq!(
            statements[3],
            "ALTER TABLE expenses ADD COLUMN IF NOT EXISTS photo_bytes BYTEA"
        );
        assert!(statements.iter().all(|s| s.contains("IF NOT EXISTS")));
    }

    #[test]
    fn test_tables_are_idempotent() {
        assert!(CREATE_TABLES.iter().all(|s| s.contains("IF NOT EXISTS")));
        assert!(CREATE_INDEXES.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
