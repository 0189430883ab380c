use super::concat::Combiner;
use super::normalize::normalize_columns;
use super::parser::parse_table;
use super::types::{CombineOutcome, CombineReport, FileError, FileSummary, SourceFile};
use crate::config::CombineConfig;
use crate::error::{Result, SheetmergeError};
use crate::export::{Delivery, ExportOptions, export_workbook};

/// Final result of a combine-and-export run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Delivered {
        delivery: Delivery,
        report: CombineReport,
    },
    /// Nothing survived combining; no workbook was produced.
    NoData { report: CombineReport },
}

impl RunOutcome {
    pub fn report(&self) -> &CombineReport {
        match self {
            Self::Delivered { report, .. } | Self::NoData { report } => report,
        }
    }
}

/// Parse, combine and normalize `sources` in order.
///
/// A file that fails to parse is recorded in the report and skipped; the
/// other files are still combined.
pub fn combine_sources(sources: &[SourceFile], config: &CombineConfig) -> CombineOutcome {
    let mut combiner = Combiner::with_header_dedupe(config.dedupe_headers);
    let mut report = CombineReport::default();

    for source in sources {
        let table = match parse_table(&source.name, &source.bytes, config.delimiter) {
            Ok(table) => table,
            Err(e) => {
                let message = match e {
                    SheetmergeError::Parse { message, .. } => message,
                    other => other.to_string(),
                };
                tracing::error!(file = %source.name, "{message}");
                report.file_errors.push(FileError {
                    file: source.name.clone(),
                    message,
                });
                continue;
            }
        };

        let skipped_rows = table.skipped_rows;
        let appended = combiner.append(table);
        tracing::info!(
            file = %source.name,
            rows = appended.rows_appended,
            skipped = skipped_rows,
            header_dropped = appended.header_dropped,
            "combined file"
        );
        report.files.push(FileSummary {
            file: source.name.clone(),
            rows_appended: appended.rows_appended,
            skipped_rows,
            header_dropped: appended.header_dropped,
        });
    }

    let mut table = combiner.finish();
    let summary = normalize_columns(&mut table, &config.numeric_columns);
    report.coercion_warnings = summary.warnings;
    report.unresolved_columns = summary.unresolved;

    CombineOutcome {
        table,
        numeric_columns: summary.columns,
        report,
    }
}

/// Combine `sources` and, if any data rows result, export them to a workbook.
///
/// # Errors
///
/// Returns an error for an invalid config or if workbook serialization fails.
/// Per-file parse failures and an empty result are not errors; they are
/// reported through [`RunOutcome`].
pub fn run(sources: &[SourceFile], config: &CombineConfig) -> Result<RunOutcome> {
    config.validate()?;
    deliver(combine_sources(sources, config), config)
}

/// Export an already combined table, or report that there is nothing to export.
///
/// Callers that need the combined table before export (to preview it, or to
/// add their own file errors to the report) combine once with
/// [`combine_sources`] and finish here.
///
/// # Errors
///
/// Returns an error for an invalid config or if workbook serialization fails.
pub fn export_outcome(outcome: CombineOutcome, config: &CombineConfig) -> Result<RunOutcome> {
    config.validate()?;
    deliver(outcome, config)
}

fn deliver(outcome: CombineOutcome, config: &CombineConfig) -> Result<RunOutcome> {
    let CombineOutcome {
        table,
        numeric_columns,
        report,
    } = outcome;

    if table.is_empty() {
        tracing::warn!(
            combined = report.files_combined(),
            failed = report.file_errors.len(),
            "no data was combined"
        );
        return Ok(RunOutcome::NoData { report });
    }

    let options = ExportOptions {
        sheet_name: config.sheet_name.clone(),
        file_name: config.file_name.clone(),
    };
    let delivery = export_workbook(&table, &numeric_columns, &options)?;
    tracing::info!("{}", report.success_message());

    Ok(RunOutcome::Delivered { delivery, report })
}
