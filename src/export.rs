//! Workbook serialization for the combined table.
//!
//! The workbook is built entirely in memory and handed back as a
//! [`Delivery`]: the bytes plus the download name and MIME type.

use crate::combiner::{CellValue, CombinedTable};
use crate::config::{DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME};
use crate::error::{Result, SheetmergeError};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Display format for whole numbers in normalized columns.
pub const INTEGER_NUMBER_FORMAT: &str = "#,##0";
/// Display format for fractional numbers in normalized columns.
pub const DECIMAL_NUMBER_FORMAT: &str = "#,##0.0#########";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub sheet_name: String,
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_owned(),
            file_name: DEFAULT_FILE_NAME.to_owned(),
        }
    }
}

/// A finished workbook ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Write `table` to a single-sheet workbook.
///
/// The header goes in the first row. Numbers in `numeric_columns` get a
/// thousands-separator display format; every other cell keeps the general
/// format. Missing cells are left empty.
///
/// # Errors
///
/// Returns [`SheetmergeError::NoData`] for a table without data rows and
/// [`SheetmergeError::Export`] if the table exceeds the sheet limits or the
/// writer fails.
pub fn export_workbook(
    table: &CombinedTable,
    numeric_columns: &[usize],
    options: &ExportOptions,
) -> Result<Delivery> {
    if table.is_empty() {
        return Err(SheetmergeError::NoData);
    }
    if table.row_count() + 1 > MAX_ROWS {
        return Err(SheetmergeError::Export(format!(
            "{} rows do not fit in one worksheet (limit {})",
            table.row_count() + 1,
            MAX_ROWS
        )));
    }

    let integer_format = Format::new().set_num_format(INTEGER_NUMBER_FORMAT);
    let decimal_format = Format::new().set_num_format(DECIMAL_NUMBER_FORMAT);

    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(options.sheet_name.as_str())?;

        for (col, name) in table.header.iter().enumerate() {
            worksheet.write_string(0, to_col(col)?, name.as_str())?;
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let row_num = to_row(idx + 1)?;
            for (col, cell) in row.iter().enumerate() {
                let col_num = to_col(col)?;
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string(row_num, col_num, text.as_str())?;
                    }
                    CellValue::Number(n) if numeric_columns.contains(&col) => {
                        let format = if n.fract() == 0.0 {
                            &integer_format
                        } else {
                            &decimal_format
                        };
                        worksheet.write_number_with_format(row_num, col_num, *n, format)?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(row_num, col_num, *n)?;
                    }
                    CellValue::Missing => {}
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::info!(
        rows = table.row_count(),
        columns = table.column_count(),
        bytes = bytes.len(),
        "workbook written"
    );

    Ok(Delivery {
        file_name: options.file_name.clone(),
        mime_type: XLSX_MIME_TYPE,
        bytes,
    })
}

fn to_row(index: usize) -> Result<RowNum> {
    RowNum::try_from(index)
        .map_err(|_| SheetmergeError::Export(format!("row {index} is out of range")))
}

fn to_col(index: usize) -> Result<ColNum> {
    if index >= MAX_COLS {
        return Err(SheetmergeError::Export(format!(
            "column {} exceeds the worksheet limit of {MAX_COLS} columns",
            index + 1
        )));
    }
    ColNum::try_from(index)
        .map_err(|_| SheetmergeError::Export(format!("column {index} is out of range")))
}
