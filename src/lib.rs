pub mod app;
pub mod config;
pub mod container;
pub mod fetch;
pub mod process;
pub mod render;
pub mod scrape;

pub use app::{LoadError, LoadReport, LoadState, Page, TableSummary};
pub use container::{Container, HtmlDocument, MemoryContainer, DEFAULT_CONTAINER_ID};
pub use fetch::{fetch_data, FetchError, Fetcher, HttpFetcher, RawDocument};
pub use process::{load_table, parse, ParseError, RaggedRows, Row, Table};
pub use render::{error_markup, render, Escaping, RenderOptions, RenderedMarkup};
