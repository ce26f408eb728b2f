use anyhow::{Context, Result};
use csvtable::{
    config::ScrapeConfig,
    scrape::{self, append_rows, RecipeRecord, DETAIL_HEADER, LISTING_HEADER},
};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = ScrapeConfig::from_env().context("reading configuration")?;
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!(listing = %config.listing_url, details = config.details, "startup");

    // ─── 2) scrape ──────────────────────────────────────────────────
    let client = config.client()?;
    let start = Instant::now();
    let records = scrape::scrape(&client, &config.listing_url, config.options())
        .await
        .with_context(|| format!("scraping {}", config.listing_url))?;
    info!(records = records.len(), elapsed = ?start.elapsed(), "scraped");

    // ─── 3) append to CSV ───────────────────────────────────────────
    let header = if config.details {
        DETAIL_HEADER
    } else {
        LISTING_HEADER
    };
    let rows: Vec<Vec<String>> = records.iter().map(RecipeRecord::to_fields).collect();
    let written = append_rows(&config.output_path, header, &rows).await?;

    info!(
        "Scraped {} products and saved to {}.",
        written,
        config.output_path.display()
    );
    Ok(())
}
