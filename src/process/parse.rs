use crate::fetch::RawDocument;
use crate::process::table::{Row, Table};

/// Split a document into a header row and data rows.
///
/// The whole document is trimmed, then split on `\n` and each line on `,`.
/// Cells are not trimmed and quotes mean nothing, so a delimiter inside a
/// field starts a new cell or row. A whitespace-only document gives a
/// header of one empty cell and no data rows.
pub fn parse(doc: &RawDocument) -> Table {
    let text = doc.as_str();
    let mut lines = text.trim().split('\n').map(split_row);
    // `split` yields at least one item, even for ""
    let headers = lines.next().unwrap_or_default();
    Table::new(headers, lines.collect()).with_header_line(1 + leading_newlines(text))
}

/// Newlines inside the leading whitespace that trimming drops.
fn leading_newlines(text: &str) -> usize {
    let skipped = text.len() - text.trim_start().len();
    text[..skipped].matches('\n').count()
}

fn split_row(line: &str) -> Row {
    line.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Row {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic_document() {
        let table = parse(&RawDocument::from("name,price\napple,1\nbanana,2"));
        assert_eq!(table.headers, cells(&["name", "price"]));
        assert_eq!(
            table.rows,
            vec![cells(&["apple", "1"]), cells(&["banana", "2"])]
        );
        assert_eq!(table.row_count(), 3);
        assert!(!table.is_ragged());
    }

    #[test]
    fn test_parse_trims_document_but_not_cells() {
        let table = parse(&RawDocument::from("\n\n  a , b\n c,d \n\n"));
        assert_eq!(table.headers, cells(&["a ", " b"]));
        assert_eq!(table.rows, vec![cells(&[" c", "d"])]);
    }

    #[test]
    fn test_parse_whitespace_only_gives_single_empty_cell() {
        let table = parse(&RawDocument::from(" \n\t \n"));
        assert_eq!(table.headers, cells(&[""]));
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_parse_keeps_ragged_rows() {
        let table = parse(&RawDocument::from("a,b\n1,2,3"));
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows, vec![cells(&["1", "2", "3"])]);
        assert!(table.is_ragged());
    }

    #[test]
    fn test_parse_ignores_quotes() {
        let table = parse(&RawDocument::from("title\n\"Salt, pepper\""));
        assert_eq!(table.rows, vec![cells(&["\"Salt", " pepper\""])]);
    }

    #[test]
    fn test_parse_crlf_keeps_carriage_return() {
        let table = parse(&RawDocument::from("a,b\r\n1,2\r\n"));
        assert_eq!(table.headers, cells(&["a", "b\r"]));
        assert_eq!(table.rows, vec![cells(&["1", "2"])]);
    }

    #[test]
    fn test_parse_records_header_line_past_leading_blanks() {
        let table = parse(&RawDocument::from("\n \r\n\na,b\n1,2"));
        assert_eq!(table.headers, cells(&["a", "b"]));
        assert_eq!(table.header_line, 4);
        assert_eq!(table.line_of_row(0), 5);

        assert_eq!(parse(&RawDocument::from("a\n1")).header_line, 1);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let doc = RawDocument::from("x,y\n1,2\n3,4");
        assert_eq!(parse(&doc), parse(&doc));
    }
}
