//! Repository traits and base implementations

use async_trait::async_trait;
use obra_core::error::ObraError;
use obra_core::traits::Id;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Insert referenced a row that does not exist
    #[error("Referenced {0} does not exist")]
    MissingReference(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for ObraError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MissingReference(entity) => ObraError::NotFound {
                entity,
                field: "id",
                value: "referenced".to_string(),
            },
            RepositoryError::Database(e) => ObraError::Database(e.to_string()),
        }
    }
}

/// Base repository trait. Records are insert-only.
#[async_trait]
pub trait Repository<T, CreateDto>: Send + Sync {
    /// Find an entity by ID
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// Create a new entity
    async fn create(&self, dto: CreateDto) -> RepositoryResult<T>;

    /// Check if an entity exists
    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Translate a foreign key violation on insert into `MissingReference`
pub(crate) fn insert_error(err: sqlx::Error, parent: &'static str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_foreign_key_violation() {
            return RepositoryError::MissingReference(parent);
        }
    }
    RepositoryError::Database(err)
}
