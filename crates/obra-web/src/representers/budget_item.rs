//! Budget item representer

use obra_models::{BudgetItem, Entity, Project};
use rust_decimal::Decimal;
use serde::Serialize;

use super::hal::{rels, HalLink, HalResource};
use super::project::ProjectRepresenter;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemRepresentation {
    #[serde(flatten)]
    pub item: BudgetItem,
    /// quantity × unit price
    pub line_value: Decimal,
}

/// A project's budget: its items and their total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRepresentation {
    pub project: HalResource<Project>,
    pub items: Vec<HalResource<BudgetItemRepresentation>>,
    pub budget_total: Decimal,
}

/// A project row of the budget overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverviewRow {
    #[serde(flatten)]
    pub project: HalResource<Project>,
    pub budget_total: Decimal,
}

pub struct BudgetItemRepresenter;

impl BudgetItemRepresenter {
    pub fn represent_item(item: BudgetItem) -> HalResource<BudgetItemRepresentation> {
        let project = HalLink::new(format!("/projects/{}/budget-items", item.project_id));
        let rep = BudgetItemRepresentation {
            line_value: item.line_value(),
            item,
        };
        HalResource::new(BudgetItem::TYPE_NAME, rep).with_link(rels::PROJECT, project)
    }

    pub fn represent_budget(
        project: Project,
        items: Vec<BudgetItem>,
        budget_total: Decimal,
    ) -> HalResource<BudgetRepresentation> {
        let href = format!("/projects/{}/budget-items", project.id);
        let rep = BudgetRepresentation {
            project: ProjectRepresenter::represent(project),
            items: items.into_iter().map(Self::represent_item).collect(),
            budget_total,
        };

        HalResource::new("Budget", rep)
            .with_link(rels::SELF, HalLink::new(&href))
            .with_link(
                rels::CREATE,
                HalLink::with_title(href, "Add budget item").method("POST"),
            )
    }

    pub fn represent_overview_row(project: Project, budget_total: Decimal) -> BudgetOverviewRow {
        BudgetOverviewRow {
            project: ProjectRepresenter::represent(project),
            budget_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_budget_document() {
        let project = Project {
            id: 1,
            name: "Casa A".into(),
            location: None,
            client: None,
            created_at: Utc::now(),
        };
        let item = BudgetItem {
            id: 9,
            project_id: 1,
            item_code: "A-01".into(),
            description: "Excavación".into(),
            unit: Some("m3".into()),
            quantity: Some(dec!(10)),
            unit_price: Some(dec!(100)),
            created_at: Utc::now(),
        };

        let doc = BudgetItemRepresenter::represent_budget(project, vec![item], dec!(1000));
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["_type"], "Budget");
        assert_eq!(json["items"][0]["_type"], "BudgetItem");
        assert_eq!(json["items"][0]["itemCode"], "A-01");
        assert_eq!(json["items"][0]["lineValue"], 1000.0);
        assert_eq!(json["budgetTotal"], 1000.0);
        assert_eq!(json["_links"]["create"]["method"], "POST");
    }
}
