// src/container.rs

use crate::render::{escape_html, RenderedMarkup};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub const DEFAULT_CONTAINER_ID: &str = "data-container";

/// The region of a host document that receives rendered output.
///
/// Every write replaces the previous content wholesale; there is no
/// partial update.
pub trait Container {
    fn id(&self) -> &str;
    fn replace_content(&mut self, markup: &RenderedMarkup);
}

/// A container that only holds its current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryContainer {
    id: String,
    content: String,
    writes: usize,
}

impl MemoryContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            writes: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// How many times the content has been replaced.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_ID)
    }
}

impl Container for MemoryContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn replace_content(&mut self, markup: &RenderedMarkup) {
        self.content.clear();
        self.content.push_str(markup.as_str());
        self.writes += 1;
        debug!(container = %self.id, bytes = self.content.len(), "container replaced");
    }
}

/// A standalone HTML page with a single container `<div>`.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    title: String,
    container: MemoryContainer,
}

impl HtmlDocument {
    pub fn new(title: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            container: MemoryContainer::new(container_id),
        }
    }

    pub fn container(&self) -> &MemoryContainer {
        &self.container
    }

    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title}</title>\n\
             </head>\n\
             <body>\n\
             <h1>{title}</h1>\n\
             <div id=\"{id}\">{content}</div>\n\
             </body>\n\
             </html>\n",
            title = title,
            id = escape_html(self.container.id()),
            content = self.container.content(),
        )
    }

    /// Write the full page to `path`, replacing any existing file.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let html = self.to_html();
        fs::write(path, html.as_bytes())
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = html.len(), "wrote page");
        Ok(())
    }
}

impl Container for HtmlDocument {
    fn id(&self) -> &str {
        self.container.id()
    }

    fn replace_content(&mut self, markup: &RenderedMarkup) {
        self.container.replace_content(markup);
    }
}
