// src/scrape/csv_out.rs

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::Path;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// Quote a field only when it holds a delimiter, a quote or a line break.
/// Embedded quotes are doubled.
pub fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// One record, `\n`-terminated.
pub fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Append `rows` to the CSV at `path`, creating it if needed. The header is
/// written only when the file is empty. Returns the number of rows written.
pub async fn append_rows<S: AsRef<str>>(
    path: impl AsRef<Path>,
    header: &[&str],
    rows: &[Vec<S>],
) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;

    let existing = file
        .metadata()
        .await
        .with_context(|| format!("reading metadata of {}", path.display()))?
        .len();

    let mut out = String::new();
    if existing == 0 {
        debug!(path = %path.display(), "new file, writing header");
        out.push_str(&csv_line(header));
    }
    for row in rows {
        out.push_str(&csv_line(row));
    }

    file.write_all(out.as_bytes())
        .await
        .with_context(|| format!("appending to {}", path.display()))?;
    file.flush().await?;
    info!(path = %path.display(), rows = rows.len(), "appended rows");
    Ok(rows.len())
}
