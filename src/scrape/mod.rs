// src/scrape/mod.rs

pub mod csv_out;
pub mod extract;

pub use csv_out::{append_rows, csv_field, csv_line};
pub use extract::{parse_listing, parse_recipe_page, RecipeCard, RecipeDetails, NOT_AVAILABLE};

use crate::fetch::{fetch_url, FetchError};
use chrono::Local;
use futures::{stream, StreamExt};
use reqwest::Client;
use tracing::{info, instrument, warn};
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://www.simplyrecipes.com/recipes-5090746";
pub const DEFAULT_SCRAPE_OUTPUT: &str = "all_recipes.csv";
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 3;

pub const LISTING_HEADER: &[&str] = &["item_url", "title", "timestamp"];
pub const DETAIL_HEADER: &[&str] = &[
    "item_url",
    "title",
    "ingredients",
    "cooking_time",
    "nutrition_facts",
    "publish_dates",
    "timestamp",
    "category",
];

/// One scraped recipe, stamped with the local time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub card: RecipeCard,
    pub details: Option<RecipeDetails>,
    pub timestamp: String,
}

impl RecipeRecord {
    pub fn header(&self) -> &'static [&'static str] {
        if self.details.is_some() {
            DETAIL_HEADER
        } else {
            LISTING_HEADER
        }
    }

    /// CSV fields in `header()` order. List and map values are JSON encoded.
    pub fn to_fields(&self) -> Vec<String> {
        let card = &self.card;
        match &self.details {
            None => vec![
                card.item_url.clone(),
                card.title.clone(),
                self.timestamp.clone(),
            ],
            Some(d) => vec![
                card.item_url.clone(),
                card.title.clone(),
                json(&d.ingredients),
                d.cooking_time.clone(),
                json(&d.nutrition_facts),
                json(&d.publish_dates),
                self.timestamp.clone(),
                card.category.clone(),
            ],
        }
    }
}

fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| NOT_AVAILABLE.to_string())
}

pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Also visit every recipe page.
    pub details: bool,
    /// Recipe pages fetched at once.
    pub concurrency: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            details: false,
            concurrency: DEFAULT_DETAIL_CONCURRENCY,
        }
    }
}

/// Read the listing page and, if asked, every recipe it links to. Records
/// keep listing order. A recipe page that fails is logged and gets `N/A`
/// details; only a failed listing fetch is an error.
#[instrument(level = "info", skip_all, fields(listing = %listing))]
pub async fn scrape(
    client: &Client,
    listing: &Url,
    options: ScrapeOptions,
) -> Result<Vec<RecipeRecord>, FetchError> {
    let html = fetch_url(client, listing).await?;
    let cards = parse_listing(html.as_str(), listing);
    info!(cards = cards.len(), "parsed listing");

    if !options.details {
        return Ok(cards
            .into_iter()
            .map(|card| RecipeRecord {
                card,
                details: None,
                timestamp: timestamp_now(),
            })
            .collect());
    }

    let records = stream::iter(cards)
        .map(|card| async move {
            let details = recipe_details(client, &card.item_url).await;
            RecipeRecord {
                card,
                details: Some(details),
                timestamp: timestamp_now(),
            }
        })
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    Ok(records)
}

async fn recipe_details(client: &Client, item_url: &str) -> RecipeDetails {
    let url = match Url::parse(item_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = item_url, error = %e, "no recipe link");
            return RecipeDetails::unavailable();
        }
    };
    match fetch_url(client, &url).await {
        Ok(page) => parse_recipe_page(page.as_str()),
        Err(e) => {
            warn!(%url, error = %crate::app::error_chain(&e), "error extracting details");
            RecipeDetails::unavailable()
        }
    }
}
