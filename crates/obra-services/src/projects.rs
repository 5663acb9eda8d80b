//! Create service for projects

use std::sync::Arc;

use async_trait::async_trait;
use obra_contracts::{Contract, CreateProjectContract, ProjectParams};
use obra_core::result::{ObraResult, ServiceResult};
use obra_db::Store;
use obra_models::Project;
use tracing::{info, instrument};

use crate::base::Callable;

/// Service for creating projects
pub struct CreateProjectService {
    store: Arc<dyn Store>,
    contract: CreateProjectContract,
}

impl CreateProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            contract: CreateProjectContract::new(),
        }
    }
}

#[async_trait]
impl Callable<ProjectParams, Project> for CreateProjectService {
    #[instrument(skip(self, params))]
    async fn call(&self, params: ProjectParams) -> ObraResult<ServiceResult<Project>> {
        let project = match self.contract.validate(&params) {
            Ok(project) => project,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };

        let project = self.store.create_project(project).await?;
        info!(id = project.id, name = %project.name, "Project created");
        Ok(ServiceResult::success(project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obra_db::MemoryStore;

    #[tokio::test]
    async fn test_create_project() {
        let store = Arc::new(MemoryStore::new());
        let service = CreateProjectService::new(store.clone());

        let result = service
            .call(ProjectParams {
                name: Some("Casa A".into()),
                location: Some("Mérida".into()),
                client: Some("".into()),
            })
            .await
            .unwrap();

        let project = result.into_result().unwrap();
        assert_eq!(project.name, "Casa A");
        assert_eq!(project.client, None);
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service = CreateProjectService::new(store.clone());

        let result = service.call(ProjectParams::default()).await.unwrap();
        assert!(result.is_failure());
        assert_eq!(result.errors.full_messages(), vec!["Name can't be blank"]);
        assert!(store.list_projects().await.unwrap().is_empty());
    }
}
