// src/app.rs

use crate::container::Container;
use crate::fetch::{FetchError, Fetcher, RawDocument};
use crate::process::{load_table, ParseError, RaggedRows};
use crate::render::{error_markup, render, RenderOptions, RenderedMarkup};
use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

/// Where a page load is. `Rendered` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LoadState {
    Idle,
    Fetching,
    Rendered,
    Failed,
}

impl LoadState {
    pub fn as_str(&self) -> &str {
        match self {
            LoadState::Idle => "Idle",
            LoadState::Fetching => "Fetching",
            LoadState::Rendered => "Rendered",
            LoadState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Rendered | LoadState::Failed)
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A page loads once; reload means a new `Page`.
    #[error("page already left Idle (state: {})", .0.as_str())]
    AlreadyLoaded(LoadState),
}

impl LoadError {
    /// Short class name for reports. Never carries the cause.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Fetch(e) if e.is_network() => "network",
            LoadError::Fetch(FetchError::HttpStatus { .. }) => "http_status",
            LoadError::Fetch(_) => "invalid_url",
            LoadError::Parse(ParseError::NoData) => "no_data",
            LoadError::Parse(ParseError::RaggedRow { .. }) => "ragged_row",
            LoadError::AlreadyLoaded(_) => "already_loaded",
        }
    }
}

/// Shape of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub columns: usize,
    pub data_rows: usize,
}

/// Machine-readable outcome of one page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub url: String,
    pub state: LoadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TableSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    /// Upstream HTTP status, when the fetch got a non-2xx response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl LoadReport {
    pub fn new(page: &Page, outcome: &Result<TableSummary, LoadError>) -> Self {
        let (summary, error, upstream_status) = match outcome {
            Ok(summary) => (Some(*summary), None, None),
            Err(e) => {
                let status = match e {
                    LoadError::Fetch(fe) => fe.status().map(|s| s.as_u16()),
                    _ => None,
                };
                (None, Some(e.kind()), status)
            }
        };
        Self {
            url: page.url().to_string(),
            state: page.state(),
            summary,
            error,
            upstream_status,
        }
    }
}

/// Fetch, parse and render without touching any container.
pub async fn fetch_and_render<F>(
    fetcher: &F,
    url: &Url,
    policy: RaggedRows,
    options: &RenderOptions,
) -> Result<(RenderedMarkup, TableSummary), LoadError>
where
    F: Fetcher + ?Sized,
{
    let doc: RawDocument = fetcher.fetch(url).await?;
    let table = load_table(&doc, policy)?;
    drop(doc);

    let summary = TableSummary {
        columns: table.width(),
        data_rows: table.rows.len(),
    };
    Ok((render(&table, options), summary))
}

/// One page load: drives a container from `Idle` to `Rendered` or `Failed`.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    policy: RaggedRows,
    options: RenderOptions,
    state: LoadState,
}

impl Page {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            policy: RaggedRows::default(),
            options: RenderOptions::default(),
            state: LoadState::Idle,
        }
    }

    pub fn with_ragged_rows(mut self, policy: RaggedRows) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Run the page load. On success the container holds the table; on any
    /// failure it holds the fixed error paragraph and the cause goes to the
    /// log. Either way the error is also returned to the caller.
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn load<F, C>(
        &mut self,
        fetcher: &F,
        container: &mut C,
    ) -> Result<TableSummary, LoadError>
    where
        F: Fetcher + ?Sized,
        C: Container + ?Sized,
    {
        if self.state != LoadState::Idle {
            return Err(LoadError::AlreadyLoaded(self.state));
        }
        self.state = LoadState::Fetching;
        info!("fetching CSV");

        match fetch_and_render(fetcher, &self.url, self.policy, &self.options).await {
            Ok((markup, summary)) => {
                container.replace_content(&markup);
                self.state = LoadState::Rendered;
                info!(
                    container = container.id(),
                    columns = summary.columns,
                    rows = summary.data_rows,
                    "rendered"
                );
                Ok(summary)
            }
            Err(err) => {
                error!(error = %error_chain(&err), "error fetching CSV data");
                container.replace_content(&error_markup());
                self.state = LoadState::Failed;
                Err(err)
            }
        }
    }
}

/// `err` followed by each of its sources, joined with `": "`. A cause whose
/// text is already in the line is skipped; reqwest and hyper errors print
/// their own causes.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
