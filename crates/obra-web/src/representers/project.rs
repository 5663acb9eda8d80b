//! Project representer

use obra_models::{Entity, Project};

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource};

pub struct ProjectRepresenter;

impl ProjectRepresenter {
    pub fn represent(project: Project) -> HalResource<Project> {
        let links = Self::build_links(&project);
        HalResource::new(Project::TYPE_NAME, project).with_links(links)
    }

    /// Projects, newest first
    pub fn represent_collection(projects: Vec<Project>) -> HalCollection<HalResource<Project>> {
        let elements = projects.into_iter().map(Self::represent).collect();
        HalCollection::new("ProjectCollection", elements)
            .with_link(rels::SELF, HalLink::new("/projects"))
            .with_link(
                rels::CREATE,
                HalLink::with_title("/projects/new", "New project").method("POST"),
            )
    }

    fn build_links(project: &Project) -> HalLinks {
        HalLinks::new()
            .with(
                rels::BUDGET_ITEMS,
                HalLink::new(format!("/projects/{}/budget-items", project.id)),
            )
            .with(
                rels::EXPENSES,
                HalLink::new(format!("/expenses?project_id={}", project.id)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_project_links() {
        let project = Project {
            id: 4,
            name: "Casa A".into(),
            location: Some("Lote 12".into()),
            client: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(ProjectRepresenter::represent(project)).unwrap();

        assert_eq!(json["_type"], "Project");
        assert_eq!(json["name"], "Casa A");
        assert_eq!(json["_links"]["budgetItems"]["href"], "/projects/4/budget-items");
        assert_eq!(json["_links"]["expenses"]["href"], "/expenses?project_id=4");
    }
}
