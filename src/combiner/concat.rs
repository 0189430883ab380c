use super::headers::is_restated_header;
use super::types::{CombinedTable, ParsedTable, Row};

/// Accumulates parsed files into one table in arrival order.
///
/// The first table that carries a header becomes the header reference. Later
/// tables lose their first data row if it repeats that header. Column counts
/// are not reconciled across files.
#[derive(Debug)]
pub struct Combiner {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
    dedupe_headers: bool,
}

/// What happened to one appended table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendResult {
    pub rows_appended: usize,
    pub header_dropped: bool,
}

impl Default for Combiner {
    fn default() -> Self {
        Self::new()
    }
}

impl Combiner {
    pub fn new() -> Self {
        Self::with_header_dedupe(true)
    }

    pub fn with_header_dedupe(dedupe_headers: bool) -> Self {
        Self {
            header: None,
            rows: Vec::new(),
            dedupe_headers,
        }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn append(&mut self, table: ParsedTable) -> AppendResult {
        let ParsedTable { header, rows, .. } = table;
        let mut rows = rows.into_iter().peekable();
        let mut header_dropped = false;

        if let Some(reference) = &self.header {
            if self.dedupe_headers
                && rows
                    .peek()
                    .is_some_and(|first| is_restated_header(reference, first))
            {
                rows.next();
                header_dropped = true;
            }
        } else {
            self.header = header;
        }

        let before = self.rows.len();
        self.rows.extend(rows);

        AppendResult {
            rows_appended: self.rows.len() - before,
            header_dropped,
        }
    }

    pub fn finish(self) -> CombinedTable {
        CombinedTable {
            header: self.header.unwrap_or_default(),
            rows: self.rows,
        }
    }
}
