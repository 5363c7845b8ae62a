use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{AppConfig, TyreQuery};
use crate::database::Database;
use crate::export::export_to_csv;
use crate::scrapers::NationalTyresScraper;
use crate::traits::TyreScraper;

/// Totals for one scraping run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub queries: usize,
    pub failed_queries: usize,
    pub saved: usize,
    pub exported: usize,
}

#[derive(Clone)]
pub struct TyreFinder {
    scraper: Arc<dyn TyreScraper>,
    database: Database,
    queries: Vec<TyreQuery>,
    csv_path: String,
}

impl TyreFinder {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let scraper = NationalTyresScraper::new(config)?;
        let database = Database::new(&config.database_url).await?;

        Ok(Self::with_parts(Arc::new(scraper), database, config))
    }

    pub fn with_parts(
        scraper: Arc<dyn TyreScraper>,
        database: Database,
        config: &AppConfig,
    ) -> Self {
        Self {
            scraper,
            database,
            queries: config.queries.clone(),
            csv_path: config.csv_path.clone(),
        }
    }

    /// Scrapes every configured size in order, stores what was found and exports the
    /// whole table. A failed query is logged and the run moves on to the next one.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary {
            queries: self.queries.len(),
            ..RunSummary::default()
        };

        for query in &self.queries {
            info!("Scraping tyres for size {}", query);

            match self.scraper.scrape_tyres(query).await {
                Ok(tyres) => {
                    for tyre in &tyres {
                        self.database.save_tyre(tyre).await?;
                    }
                    info!("Saved {} tyres for {}", tyres.len(), query);
                    summary.saved += tyres.len();
                }
                Err(e) => {
                    error!("Error scraping {}: {:#}", query, e);
                    summary.failed_queries += 1;
                }
            }
        }

        let rows = self.database.fetch_all().await?;
        summary.exported = export_to_csv(&rows, &self.csv_path)?;

        info!(
            "Scraping complete: {} saved, {} exported to {}",
            summary.saved, summary.exported, self.csv_path
        );
        Ok(summary)
    }
}
