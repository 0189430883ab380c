//! The combine pipeline: parse each source file, drop restated headers,
//! concatenate, and coerce the selected columns to numbers.

pub mod concat;
pub mod flows;
pub mod headers;
pub mod normalize;
pub mod parser;
pub mod types;

pub use concat::{AppendResult, Combiner};
pub use flows::{RunOutcome, combine_sources, export_outcome, run};
pub use headers::is_restated_header;
pub use normalize::{NormalizeSummary, coerce_number, normalize_columns, resolve_columns};
pub use parser::parse_table;
pub use types::{
    CellValue, CoercionWarning, CombineOutcome, CombineReport, CombinedTable, FileError,
    FileSummary, ParsedTable, Row, SourceFile,
};
