// src/process/mod.rs

pub mod parse;
pub mod policy;
pub mod table;

pub use parse::parse;
pub use policy::{apply_ragged_policy, RaggedRows};
pub use table::{Row, Table};

use crate::fetch::RawDocument;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but whitespace came back.
    #[error("document contains no data")]
    NoData,

    /// A data row's width differs from the header's under `RaggedRows::Reject`.
    /// `line` is 1-based in the fetched body, blank leading lines included.
    #[error("line {line} has {found} cells, header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Parse a fetched document into a table, treating an empty document as
/// `NoData` and applying `policy` to mismatched rows.
#[instrument(level = "debug", skip(doc), fields(bytes = doc.as_str().len()))]
pub fn load_table(doc: &RawDocument, policy: RaggedRows) -> Result<Table, ParseError> {
    if doc.as_str().trim().is_empty() {
        return Err(ParseError::NoData);
    }
    let table = apply_ragged_policy(parse(doc), policy)?;
    debug!(
        columns = table.width(),
        rows = table.rows.len(),
        ragged = table.is_ragged(),
        "parsed"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_table_empty_is_no_data() {
        for text in ["", "   ", "\n\r\n\t"] {
            let err = load_table(&RawDocument::from(text), RaggedRows::Keep).unwrap_err();
            assert_eq!(err, ParseError::NoData);
        }
    }

    #[test]
    fn test_load_table_keeps_ragged_by_default() {
        let table = load_table(&RawDocument::from("a,b\n1,2,3"), RaggedRows::default()).unwrap();
        assert_eq!(table.rows[0].len(), 3);
    }

    #[test]
    fn test_load_table_reject_surfaces_error() {
        let err = load_table(&RawDocument::from("a,b\n1,2,3"), RaggedRows::Reject).unwrap_err();
        assert!(matches!(err, ParseError::RaggedRow { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2 has 3 cells, header has 2");
    }
}
