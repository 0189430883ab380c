use crate::error::{Result, ResultExt as _, SheetmergeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_SHEET_NAME: &str = "Combined";
pub const DEFAULT_FILE_NAME: &str = "Combined.xlsx";

/// Spreadsheet columns A, B, O and P.
pub const DEFAULT_NUMERIC_COLUMNS: [usize; 4] = [0, 1, 14, 15];

const SHEET_NAME_MAX_LEN: usize = 31;
const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const SHEET_NAME_RESERVED: &str = "History";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    #[default]
    Pipe,
    Tab,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Pipe => b'|',
            Self::Tab => b'\t',
            Self::Semicolon => b';',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "pipe" | "|" => Ok(Self::Pipe),
            "tab" | "\\t" | "\t" => Ok(Self::Tab),
            "semicolon" | ";" => Ok(Self::Semicolon),
            other => Err(format!(
                "unknown delimiter '{other}' (expected comma, pipe, tab or semicolon)"
            )),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Comma => "comma",
            Self::Pipe => "pipe",
            Self::Tab => "tab",
            Self::Semicolon => "semicolon",
        };
        f.write_str(name)
    }
}

/// Selects a column either by zero-based position or by header name.
///
/// In JSON a number is an index and a string is a name. On the command line
/// `#3` is an index and anything else is a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl FromStr for ColumnRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix('#') {
            return digits
                .parse()
                .map(Self::Index)
                .map_err(|_| format!("'{s}' is not a valid column index"));
        }
        if s.is_empty() {
            return Err("column name must not be empty".to_owned());
        }
        Ok(Self::Name(s.to_owned()))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

fn default_numeric_columns() -> Vec<ColumnRef> {
    DEFAULT_NUMERIC_COLUMNS
        .iter()
        .copied()
        .map(ColumnRef::Index)
        .collect()
}

fn default_dedupe_headers() -> bool {
    true // Default ON
}

/// Settings for one combine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub delimiter: Delimiter,
    #[serde(default = "default_numeric_columns")]
    pub numeric_columns: Vec<ColumnRef>,
    pub sheet_name: String,
    pub file_name: String,
    #[serde(default = "default_dedupe_headers")]
    pub dedupe_headers: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            numeric_columns: default_numeric_columns(),
            sheet_name: DEFAULT_SHEET_NAME.to_owned(),
            file_name: DEFAULT_FILE_NAME.to_owned(),
            dedupe_headers: default_dedupe_headers(),
        }
    }
}

impl CombineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`CombineConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`SheetmergeError::Config`] for a sheet name Excel would reject
    /// or an output name without the `.xlsx` extension.
    pub fn validate(&self) -> Result<()> {
        let name = self.sheet_name.as_str();
        if name.trim().is_empty() {
            return Err(SheetmergeError::Config(
                "sheet name must not be empty".to_owned(),
            ));
        }
        if name.chars().count() > SHEET_NAME_MAX_LEN {
            return Err(SheetmergeError::Config(format!(
                "sheet name '{name}' is longer than {SHEET_NAME_MAX_LEN} characters"
            )));
        }
        if name.contains(SHEET_NAME_FORBIDDEN) {
            return Err(SheetmergeError::Config(format!(
                "sheet name '{name}' contains one of []:*?/\\"
            )));
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return Err(SheetmergeError::Config(format!(
                "sheet name '{name}' must not start or end with an apostrophe"
            )));
        }
        if name.eq_ignore_ascii_case(SHEET_NAME_RESERVED) {
            return Err(SheetmergeError::Config(format!(
                "sheet name '{name}' is reserved by Excel"
            )));
        }
        if !self.file_name.to_lowercase().ends_with(".xlsx") {
            return Err(SheetmergeError::Config(format!(
                "output file name '{}' must end in .xlsx",
                self.file_name
            )));
        }
        Ok(())
    }
}
