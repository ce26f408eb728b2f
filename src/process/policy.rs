use crate::process::table::Table;
use crate::process::ParseError;
use tracing::debug;

/// What to do with data rows whose cell count differs from the header's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RaggedRows {
    /// Render as-is with mismatched column counts.
    #[default]
    Keep,
    /// Append empty cells up to the header width. Longer rows are kept.
    Pad,
    /// Cut rows to the header width. Shorter rows are kept.
    Truncate,
    /// Fail on the first mismatched row.
    Reject,
}

impl RaggedRows {
    pub fn as_str(&self) -> &str {
        match self {
            RaggedRows::Keep => "keep",
            RaggedRows::Pad => "pad",
            RaggedRows::Truncate => "truncate",
            RaggedRows::Reject => "reject",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Some(RaggedRows::Keep),
            "pad" => Some(RaggedRows::Pad),
            "truncate" => Some(RaggedRows::Truncate),
            "reject" => Some(RaggedRows::Reject),
            _ => None,
        }
    }
}

pub fn apply_ragged_policy(mut table: Table, policy: RaggedRows) -> Result<Table, ParseError> {
    let width = table.width();
    match policy {
        RaggedRows::Keep => {}
        RaggedRows::Pad => {
            for row in table.rows.iter_mut().filter(|r| r.len() < width) {
                row.resize(width, String::new());
            }
        }
        RaggedRows::Truncate => {
            for row in table.rows.iter_mut() {
                row.truncate(width);
            }
        }
        RaggedRows::Reject => {
            if let Some((i, row)) = table
                .rows
                .iter()
                .enumerate()
                .find(|(_, r)| r.len() != width)
            {
                let line = table.line_of_row(i);
                debug!(line, expected = width, found = row.len(), "ragged row");
                return Err(ParseError::RaggedRow {
                    line,
                    expected: width,
                    found: row.len(),
                });
            }
        }
    }
    Ok(table)
}
