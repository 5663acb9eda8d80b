//! Core traits shared by the domain models

/// Primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities that belong to a project
pub trait ProjectScoped {
    fn project_id(&self) -> Id;

    fn belongs_to(&self, project_id: Id) -> bool {
        self.project_id() == project_id
    }
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Send + Sync {
    /// Type name used in error messages and HAL `_type`
    const TYPE_NAME: &'static str;
}
