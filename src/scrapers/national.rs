//! national.co.uk specific scraper implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::config::{AppConfig, TyreQuery};
use crate::models::Tyre;
use crate::pages::ListingPageParser;
use crate::traits::{ScraperConfig, SiteLayout, TyreScraper};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; TyreScraper/1.0)";

/// Scraper implementation for National Tyres
#[derive(Clone)]
pub struct NationalTyresScraper {
    client: Client,
    config: ScraperConfig,
    parser: ListingPageParser,
    scrape_delay: Duration,
}

impl NationalTyresScraper {
    pub fn new(app_config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(app_config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Self::with_client(client, app_config.scrape_delay)
    }

    pub fn with_client(client: Client, scrape_delay: Duration) -> Result<Self> {
        let config = ScraperConfig {
            website: "www.national.co.uk".to_string(),
            search_url_pattern:
                "https://www.national.co.uk/tyres-search/{width}-{aspect_ratio}-{rim_size}"
                    .to_string(),
            layout: SiteLayout::national(),
        };
        config.layout.check_selectors()?;
        let parser = ListingPageParser::new(&config);

        Ok(Self {
            client,
            config,
            parser,
            scrape_delay,
        })
    }
}

#[async_trait]
impl TyreScraper for NationalTyresScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn scrape_tyres(&self, query: &TyreQuery) -> Result<Vec<Tyre>> {
        let url = self.build_search_url(query);
        info!("Fetching {} for size {}", url, query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed for {query}"))?;

        // Be polite to the site regardless of the outcome
        info!("Sleeping for {:?} before parsing", self.scrape_delay);
        tokio::time::sleep(self.scrape_delay).await;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch data for {} on {}: {}",
                query,
                self.config.website,
                response.status()
            ));
        }

        let html = response.text().await?;

        // Parsing is synchronous so the document never lives across an await
        let report = self.parser.parse_page(&html);

        info!(
            "Scraped {} tyres for {} ({} listings skipped)",
            report.tyres.len(),
            query,
            report.rejected.len()
        );
        Ok(report.tyres)
    }
}
