use std::fmt;
use std::path::Path;

/// A single uploaded file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after its final path component.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// A cell of the combined table.
///
/// Everything starts out as [`CellValue::Text`]; only normalized columns ever
/// hold [`CellValue::Number`] or [`CellValue::Missing`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Missing => Ok(()),
        }
    }
}

pub type Row = Vec<CellValue>;

/// One source file parsed into header + data rows.
///
/// Every row has exactly `header.len()` cells. A file with no records at all
/// has no header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Row>,
    /// Records dropped because their field count differed from the header.
    pub skipped_rows: usize,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.rows.is_empty()
    }
}

/// All files' data rows under the header of the first file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl CombinedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// True when there are no data rows, whether or not a header exists.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in {}: {}", self.file, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file: String,
    pub rows_appended: usize,
    pub skipped_rows: usize,
    pub header_dropped: bool,
}

/// Non-blank cells in a normalized column that could not be read as numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionWarning {
    pub column: String,
    pub failed: usize,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (noun, verb) = if self.failed == 1 {
            ("value", "was")
        } else {
            ("values", "were")
        };
        write!(
            f,
            "Column {}: {} {noun} {verb} not numeric and left blank",
            self.column, self.failed
        )
    }
}

/// Everything the user should be told about a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    pub files: Vec<FileSummary>,
    pub file_errors: Vec<FileError>,
    pub coercion_warnings: Vec<CoercionWarning>,
    /// Column selectors that matched nothing in the header.
    pub unresolved_columns: Vec<String>,
}

impl CombineReport {
    pub fn files_combined(&self) -> usize {
        self.files.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.file_errors.is_empty()
    }

    pub fn success_message(&self) -> String {
        format!("{} files combined successfully!", self.files_combined())
    }
}

/// Combined, normalized data and the run report, before export.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineOutcome {
    pub table: CombinedTable,
    /// Indices of the columns that were normalized.
    pub numeric_columns: Vec<usize>,
    pub report: CombineReport,
}
