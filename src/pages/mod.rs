use scraper::Html;
use tracing::{info, warn};

use crate::assembler::EntityAssembler;
use crate::error::AggregateFieldError;
use crate::models::Tyre;
use crate::traits::ScraperConfig;

/// Outcome of parsing one search results page.
#[derive(Debug, Default)]
pub struct PageReport {
    pub tyres: Vec<Tyre>,
    pub rejected: Vec<AggregateFieldError>,
}

impl PageReport {
    pub fn listings_seen(&self) -> usize {
        self.tyres.len() + self.rejected.len()
    }
}

#[derive(Debug, Clone)]
pub struct ListingPageParser {
    assembler: EntityAssembler,
}

impl ListingPageParser {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            assembler: EntityAssembler::new(config.website.clone(), config.layout.clone()),
        }
    }

    /// Assembles every listing on the page. A listing that fails validation is
    /// logged and recorded in `rejected`; the rest of the page is still processed.
    pub fn parse_page(&self, html: &str) -> PageReport {
        let document = Html::parse_document(html);
        let records = self.assembler.extractor().extract_all(&document.root_element());
        let mut report = PageReport::default();

        for raw in records {
            match self.assembler.assemble_record(raw) {
                Ok(tyre) => report.tyres.push(tyre),
                Err(e) => {
                    warn!("Skipping listing: {}", e);
                    report.rejected.push(e);
                }
            }
        }

        info!(
            "Parsed {} listings ({} valid, {} rejected)",
            report.listings_seen(),
            report.tyres.len(),
            report.rejected.len()
        );
        report
    }
}
