use anyhow::{Context, Result};
use csvtable::{config::Config, HtmlDocument};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let config = Config::from_env().context("reading configuration")?;
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!(url = %config.csv_url, output = %config.output_path.display(), "startup");

    // ─── 2) one page load ───────────────────────────────────────────
    let fetcher = config.fetcher()?;
    let mut document = HtmlDocument::new(&config.page_title, &config.container_id);
    let mut page = config.page();
    let outcome = page.load(&fetcher, &mut document).await;

    // ─── 3) the page is written either way ─────────────────────────
    document.write_to(&config.output_path).await?;

    match outcome {
        Ok(summary) => {
            info!(
                columns = summary.columns,
                rows = summary.data_rows,
                state = page.state().as_str(),
                "all done"
            );
            Ok(())
        }
        Err(e) => {
            error!(state = page.state().as_str(), "page load failed");
            Err(e).context("loading CSV data")
        }
    }
}
