// src/config.rs

use crate::app::Page;
use crate::container::DEFAULT_CONTAINER_ID;
use crate::fetch::HttpFetcher;
use crate::process::RaggedRows;
use crate::render::{Escaping, RenderOptions};
use crate::scrape::{
    ScrapeOptions, DEFAULT_DETAIL_CONCURRENCY, DEFAULT_LISTING_URL, DEFAULT_SCRAPE_OUTPUT,
};
use reqwest::Client;
use anyhow::{anyhow, Context, Result};
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_CSV_URL: &str =
    "https://raw.githubusercontent.com/Youssef37243/DataProjectME/main/recipes.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "index.html";
pub const DEFAULT_PAGE_TITLE: &str = "Recipes";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SCRAPE_USER_AGENT: &str = "Mozilla/5.0 (compatible; csvtable-scrape/0.1)";

/// Runtime settings, read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub csv_url: Url,
    pub container_id: String,
    pub page_title: String,
    pub output_path: PathBuf,
    pub ragged_rows: RaggedRows,
    pub escape_html: bool,
    /// `None` leaves timing out to the transport.
    pub request_timeout: Option<Duration>,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and empty values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("CSV_URL").unwrap_or_else(|| DEFAULT_CSV_URL.to_string());
        let csv_url =
            Url::parse(&raw_url).with_context(|| format!("parsing CSV_URL '{}'", raw_url))?;

        let ragged_rows = match get("RAGGED_ROWS") {
            Some(v) => RaggedRows::from_str(&v).ok_or_else(|| {
                anyhow!("RAGGED_ROWS must be keep, pad, truncate or reject, got '{}'", v)
            })?,
            None => RaggedRows::default(),
        };

        let escape_html = match get("ESCAPE_HTML") {
            Some(v) => parse_bool(&v).with_context(|| "parsing ESCAPE_HTML")?,
            None => true,
        };

        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("parsing REQUEST_TIMEOUT_SECS '{}'", v))
            })
            .transpose()?;

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("parsing PORT '{}'", v))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            csv_url,
            container_id: get("CONTAINER_ID").unwrap_or_else(|| DEFAULT_CONTAINER_ID.to_string()),
            page_title: get("PAGE_TITLE").unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            output_path: get("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            ragged_rows,
            escape_html,
            request_timeout,
            port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            escape: if self.escape_html {
                Escaping::Html
            } else {
                Escaping::Verbatim
            },
            ..RenderOptions::default()
        }
    }

    /// A fresh, idle page load for the configured URL.
    pub fn page(&self) -> Page {
        Page::new(self.csv_url.clone())
            .with_ragged_rows(self.ragged_rows)
            .with_render_options(self.render_options())
    }

    pub fn fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::with_timeout(self.request_timeout).context("building HTTP client")
    }
}

/// Settings for the recipe scraper, read from `SCRAPE_*` variables.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub listing_url: Url,
    pub output_path: PathBuf,
    pub details: bool,
    pub concurrency: usize,
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
    pub log_level: String,
}

impl ScrapeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("SCRAPE_URL").unwrap_or_else(|| DEFAULT_LISTING_URL.to_string());
        let listing_url =
            Url::parse(&raw_url).with_context(|| format!("parsing SCRAPE_URL '{}'", raw_url))?;

        let details = match get("SCRAPE_DETAILS") {
            Some(v) => parse_bool(&v).with_context(|| "parsing SCRAPE_DETAILS")?,
            None => false,
        };

        let concurrency = match get("SCRAPE_CONCURRENCY") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(anyhow!("SCRAPE_CONCURRENCY must be a positive integer, got '{}'", v)),
            },
            None => DEFAULT_DETAIL_CONCURRENCY,
        };

        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("parsing REQUEST_TIMEOUT_SECS '{}'", v))
            })
            .transpose()?;

        Ok(Self {
            listing_url,
            output_path: get("SCRAPE_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRAPE_OUTPUT)),
            details,
            concurrency,
            user_agent: get("SCRAPE_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_SCRAPE_USER_AGENT.to_string()),
            request_timeout,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn options(&self) -> ScrapeOptions {
        ScrapeOptions {
            details: self.details,
            concurrency: self.concurrency,
        }
    }

    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("building scrape HTTP client")
    }
}

fn parse_bool(v: &str) -> Result<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got '{}'", other)),
    }
}
