//! Expense and daily ledger representers

use chrono::NaiveDate;
use obra_core::traits::Id;
use obra_models::{Entity, Expense, Project};
use obra_services::DailyLedger;
use rust_decimal::Decimal;
use serde::Serialize;

use super::hal::{rels, HalLink, HalLinks, HalResource};

/// The daily ledger page: the day's expenses plus the project picker
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRepresentation {
    pub date: NaiveDate,
    pub project_id: Option<Id>,
    pub expenses: Vec<HalResource<Expense>>,
    pub day_total: Decimal,
    pub projects: Vec<ProjectOption>,
}

/// Entry of the project selector
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOption {
    pub id: Id,
    pub name: String,
}

pub struct ExpenseRepresenter;

impl ExpenseRepresenter {
    pub fn represent(expense: Expense) -> HalResource<Expense> {
        let mut links = HalLinks::new().with(
            rels::PROJECT,
            HalLink::new(format!("/projects/{}/budget-items", expense.project_id)),
        );
        if expense.has_photo() {
            let title = expense.photo_name.clone().unwrap_or_else(|| "photo".into());
            links.add(
                rels::PHOTO,
                HalLink::with_title(format!("/expenses/{}/photo", expense.id), title),
            );
        }

        HalResource::new(Expense::TYPE_NAME, expense).with_links(links)
    }

    pub fn represent_ledger(
        ledger: DailyLedger,
        projects: Vec<Project>,
    ) -> HalResource<LedgerRepresentation> {
        let self_href = match ledger.project_id {
            Some(id) => format!("/expenses?date={}&project_id={}", ledger.date, id),
            None => format!("/expenses?date={}", ledger.date),
        };

        let rep = LedgerRepresentation {
            date: ledger.date,
            project_id: ledger.project_id,
            expenses: ledger.expenses.into_iter().map(Self::represent).collect(),
            day_total: ledger.day_total,
            projects: projects
                .into_iter()
                .map(|p| ProjectOption {
                    id: p.id,
                    name: p.name,
                })
                .collect(),
        };

        HalResource::new("DailyLedger", rep)
            .with_link(rels::SELF, HalLink::new(self_href))
            .with_link(
                rels::CREATE,
                HalLink::with_title("/expenses", "Log expense").method("POST"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn expense(id: Id, photo_url: Option<&str>) -> Expense {
        Expense {
            id,
            project_id: 2,
            spent_on: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            concept: "Cemento".into(),
            amount: Some(dec!(150.50)),
            category: Some("Materiales".into()),
            photo_name: photo_url.map(|_| "ticket.jpg".to_string()),
            photo_mime: photo_url.map(|_| "image/jpeg".to_string()),
            photo_url: photo_url.map(str::to_string),
            photo_ref: None,
            has_photo_blob: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_photo_link_only_when_present() {
        let with = serde_json::to_value(ExpenseRepresenter::represent(expense(
            7,
            Some("https://media.example/x.jpg"),
        )))
        .unwrap();
        assert_eq!(with["_links"]["photo"]["href"], "/expenses/7/photo");
        assert_eq!(with["_links"]["photo"]["title"], "ticket.jpg");

        let without = serde_json::to_value(ExpenseRepresenter::represent(expense(8, None))).unwrap();
        assert!(without["_links"].get("photo").is_none());
        assert_eq!(without["spentOn"], "2024-05-02");
    }

    #[test]
    fn test_ledger_self_link_keeps_filter() {
        let ledger = DailyLedger {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            project_id: Some(2),
            expenses: vec![expense(1, None)],
            day_total: dec!(150.50),
        };
        let json = serde_json::to_value(ExpenseRepresenter::represent_ledger(ledger, vec![])).unwrap();

        assert_eq!(json["_links"]["self"]["href"], "/expenses?date=2024-05-02&project_id=2");
        assert_eq!(json["dayTotal"], 150.5);
        assert_eq!(json["expenses"][0]["concept"], "Cemento");
    }
}
