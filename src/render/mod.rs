// src/render/mod.rs

pub mod escape;

pub use escape::{escape_html, push_escaped};

use crate::process::Table;
use std::fmt;
use tracing::debug;

pub const DEFAULT_MAX_CELL_WIDTH_PX: u32 = 300;

/// Shown to the user for every failure. Details only go to the log.
pub const ERROR_MESSAGE: &str = "Failed to load data. Check console for details.";

/// How cell text is placed into markup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Encode `& < > " '`. Cell text always shows up as text.
    #[default]
    Html,
    /// Insert cell text as-is. Only safe for trusted sources.
    Verbatim,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub escape: Escaping,
    /// Width cap for data cells, in CSS pixels.
    pub max_cell_width_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape: Escaping::default(),
            max_cell_width_px: DEFAULT_MAX_CELL_WIDTH_PX,
        }
    }
}

/// HTML produced for a container. Replaces whatever the container held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkup(String);

impl RenderedMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build `<table>` markup: the header row as `<th>` cells in `<thead>`,
/// every other row as `<td>` cells in `<tbody>`. Data cells carry a style
/// that wraps long text and caps the width.
pub fn render(table: &Table, options: &RenderOptions) -> RenderedMarkup {
    let td_open = format!(
        r#"<td style="word-wrap: break-word; max-width: {}px;">"#,
        options.max_cell_width_px
    );

    let mut html = String::from("<table><thead><tr>");
    for header in &table.headers {
        html.push_str("<th>");
        push_cell(&mut html, header, options.escape);
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&td_open);
            push_cell(&mut html, cell, options.escape);
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    debug!(bytes = html.len(), rows = table.rows.len(), "rendered table");
    RenderedMarkup(html)
}

/// The fixed failure paragraph.
pub fn error_markup() -> RenderedMarkup {
    RenderedMarkup(format!(r#"<p style="color: red;">{}</p>"#, ERROR_MESSAGE))
}

fn push_cell(out: &mut String, cell: &str, escape: Escaping) {
    match escape {
        Escaping::Html => push_escaped(out, cell),
        Escaping::Verbatim => out.push_str(cell),
    }
}
