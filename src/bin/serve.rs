use anyhow::{Context, Result};
use csvtable::{config::Config, HtmlDocument, HttpFetcher, LoadError, LoadReport, MemoryContainer};
use std::{sync::Arc, time::Instant};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

/// Shared across requests. Each request still gets its own page and
/// container.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    fetcher: HttpFetcher,
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "csvtable"
    })))
}

/// One page load per request.
async fn index(state: AppState) -> Result<impl Reply, Rejection> {
    let start = Instant::now();
    let mut document = HtmlDocument::new(&state.config.page_title, &state.config.container_id);
    let mut page = state.config.page();

    let status = match page.load(&state.fetcher, &mut document).await {
        Ok(summary) => {
            info!(
                columns = summary.columns,
                rows = summary.data_rows,
                elapsed = ?start.elapsed(),
                "served table"
            );
            StatusCode::OK
        }
        Err(e) => {
            warn!(elapsed = ?start.elapsed(), "served error page");
            status_for(&e)
        }
    };

    Ok(warp::reply::with_status(
        warp::reply::html(document.to_html()),
        status,
    ))
}

/// One page load, answered with its `LoadReport` as JSON.
async fn summary(state: AppState) -> Result<impl Reply, Rejection> {
    let mut container = MemoryContainer::new(&state.config.container_id);
    let mut page = state.config.page();
    let outcome = page.load(&state.fetcher, &mut container).await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    let report = LoadReport::new(&page, &outcome);
    info!(state = report.state.as_str(), "served summary");

    Ok(warp::reply::with_status(warp::reply::json(&report), status))
}

fn status_for(err: &LoadError) -> StatusCode {
    match err {
        LoadError::Fetch(_) => StatusCode::BAD_GATEWAY,
        LoadError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LoadError::AlreadyLoaded(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let with_state = warp::any().map(move || state.clone());

    let report = warp::path("summary")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state.clone())
        .and_then(summary);

    let table = warp::path::end()
        .and(warp::get())
        .and(with_state)
        .and_then(index);

    health.or(report).or(table)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("reading configuration")?;
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting CSV table service");

    let state = AppState {
        fetcher: config.fetcher()?,
        config: Arc::new(config),
    };
    let port = state.config.port;

    info!(url = %state.config.csv_url, "Serving CSV");
    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("Table page: http://localhost:{}/", port);
    info!("Load summary: http://localhost:{}/summary", port);

    warp::serve(routes(state)).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
