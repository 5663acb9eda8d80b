//! Index document

use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use crate::extractors::{AppState, HalResponse};
use crate::representers::hal::{rels, HalLink, HalResource};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub app_title: String,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let root = Root {
        app_title: state.config.instance.app_title.clone(),
    };

    HalResponse(
        HalResource::new("Root", root)
            .with_link(rels::SELF, HalLink::new("/"))
            .with_link("projects", HalLink::with_title("/projects", "Projects"))
            .with_link("newProject", HalLink::with_title("/projects/new", "New project"))
            .with_link("budget", HalLink::with_title("/budget", "Budget"))
            .with_link(rels::EXPENSES, HalLink::with_title("/expenses", "Daily expenses"))
            .with_link("dashboard", HalLink::with_title("/dashboard", "Dashboard")),
    )
}
