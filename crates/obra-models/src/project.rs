//! Project model
//!
//! Table: projects

use chrono::{DateTime, Utc};
use obra_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A construction job ("obra") being tracked.
///
/// Projects are created once and never updated or deleted. Budget items and
/// expenses point at a project through `project_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,

    /// Display name
    pub name: String,

    /// Site address or free-form location
    pub location: Option<String>,

    /// Client the job is built for
    pub client: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Identifiable for Project {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";
}

/// Insert DTO for a project
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProject {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(length(max = 200))]
    pub location: Option<String>,

    #[validate(length(max = 120))]
    pub client: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            client: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }
}
