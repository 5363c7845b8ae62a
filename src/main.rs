use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tyre_scraper::TyreFinder;
use tyre_scraper::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting tyre scraper");

    let config = AppConfig::from_env()?;
    let finder = TyreFinder::new(&config).await?;
    let summary = finder.run().await?;

    info!(
        "Run finished: {} queries ({} failed), {} tyres saved",
        summary.queries, summary.failed_queries, summary.saved
    );
    Ok(())
}
