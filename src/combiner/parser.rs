use super::types::{CellValue, ParsedTable};
use crate::config::Delimiter;
use crate::error::{Result, SheetmergeError};
use csv::{ReaderBuilder, Trim};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse one file's bytes into a header and text rows.
///
/// The first record is the header. Records whose field count differs from
/// the header are dropped and counted in [`ParsedTable::skipped_rows`].
///
/// # Errors
///
/// Returns [`SheetmergeError::Parse`] if the bytes are not valid UTF-8 or the
/// reader fails mid-file.
pub fn parse_table(name: &str, bytes: &[u8], delimiter: Delimiter) -> Result<ParsedTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        SheetmergeError::parse(
            name,
            format!("invalid UTF-8 at byte {}", e.valid_up_to()),
        )
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut table = ParsedTable::default();
    let mut width = 0;

    for (line, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| SheetmergeError::parse(name, format!("record {}: {e}", line + 1)))?;

        if table.header.is_none() {
            width = record.len();
            table.header = Some(record.iter().map(str::to_owned).collect());
            continue;
        }

        if record.len() != width {
            tracing::debug!(
                file = name,
                record = line + 1,
                fields = record.len(),
                expected = width,
                "skipping malformed row"
            );
            table.skipped_rows += 1;
            continue;
        }

        table
            .rows
            .push(record.iter().map(CellValue::text).collect());
    }

    Ok(table)
}
