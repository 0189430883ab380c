use super::types::CellValue;

/// True when `row` repeats the reference header exactly.
///
/// Comparison is positional and byte-for-byte: a difference in case,
/// whitespace, order, or length means the row is data.
pub fn is_restated_header(reference: &[String], row: &[CellValue]) -> bool {
    reference.len() == row.len()
        && reference
            .iter()
            .zip(row)
            .all(|(name, cell)| cell.as_text() == Some(name.as_str()))
}
