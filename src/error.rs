//! Centralized error handling for sheetmerge.
//!
//! Most failures in a combine run are *not* errors: malformed rows are
//! skipped, numeric coercion failures become blank cells, and a file that
//! cannot be parsed is reported and left out. [`SheetmergeError`] covers what
//! remains: a single file's parse failure (caught by the pipeline and turned
//! into a report entry), bad configuration, I/O, and workbook export.
//!
//! ## Context Extension Trait
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`SheetmergeError`]:
//!
//! ```no_run
//! use sheetmerge::error::ResultExt as _;
//!
//! fn load() -> sheetmerge::error::Result<String> {
//!     let text = std::fs::read_to_string("part1.txt").context("Failed to read upload")?;
//!     Ok(text)
//! }
//! ```

use std::fmt;

/// Main error type for sheetmerge operations.
#[derive(Debug)]
pub enum SheetmergeError {
    /// I/O errors (reading uploads, writing the workbook)
    Io(std::io::Error),

    /// A source file could not be parsed as a delimited table
    Parse { file: String, message: String },

    /// Configuration errors
    Config(String),

    /// Workbook serialization errors
    Export(String),

    /// The combined table has no data rows, so there is nothing to export
    NoData,

    /// Generic error with context
    Other(String),
}

impl SheetmergeError {
    /// Build a parse error for the named file.
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SheetmergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse { file, message } => write!(f, "Error in {file}: {message}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::NoData => write!(
                f,
                "No data was combined — check your files for valid content."
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SheetmergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SheetmergeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SheetmergeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetmergeError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for sheetmerge operations.
pub type Result<T> = std::result::Result<T, SheetmergeError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `msg` as a prefix.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the closure's message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SheetmergeError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: SheetmergeError = e.into();
            SheetmergeError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: SheetmergeError = e.into();
            SheetmergeError::Other(format!("{}: {}", f(), err))
        })
    }
}
