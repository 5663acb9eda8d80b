//! Dashboard representer

use obra_services::PortfolioSummary;

use super::hal::{rels, HalLink, HalResource};

pub struct SummaryRepresenter;

impl SummaryRepresenter {
    pub fn represent_portfolio(summary: PortfolioSummary) -> HalResource<PortfolioSummary> {
        HalResource::new("PortfolioSummary", summary)
            .with_link(rels::SELF, HalLink::new("/dashboard"))
            .with_link("projects", HalLink::new("/projects"))
    }
}
