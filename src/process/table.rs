/// One line of the document, split on commas. Cells are kept as text.
pub type Row = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// The first line of the document. Always present, even if malformed.
    pub headers: Row,
    /// Every following line, in document order.
    pub rows: Vec<Row>,
    /// 1-based line of the header in the fetched body, before trimming.
    pub header_line: usize,
}

impl Table {
    pub fn new(headers: Row, rows: Vec<Row>) -> Self {
        Self {
            headers,
            rows,
            header_line: 1,
        }
    }

    pub fn with_header_line(mut self, line: usize) -> Self {
        self.header_line = line;
        self
    }

    /// 1-based body line of data row `index`.
    pub fn line_of_row(&self, index: usize) -> usize {
        self.header_line + 1 + index
    }

    /// Column count as declared by the header row.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Header plus data rows.
    pub fn row_count(&self) -> usize {
        1 + self.rows.len()
    }

    /// True when some data row has a different cell count than the header.
    pub fn is_ragged(&self) -> bool {
        self.rows.iter().any(|r| r.len() != self.width())
    }
}
