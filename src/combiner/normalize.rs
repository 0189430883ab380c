use super::types::{CellValue, CoercionWarning, CombinedTable};
use crate::config::ColumnRef;
use crate::utils::column_letter;

/// Outcome of coercing the selected columns to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Resolved zero-based column indices, in selection order, deduplicated.
    pub columns: Vec<usize>,
    pub warnings: Vec<CoercionWarning>,
    pub unresolved: Vec<String>,
}

/// Resolve selectors against the header.
///
/// Names match exactly; indices must be inside the header. Returns the
/// resolved indices and the display form of every selector that missed.
pub fn resolve_columns(header: &[String], selectors: &[ColumnRef]) -> (Vec<usize>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for selector in selectors {
        let index = match selector {
            ColumnRef::Index(i) => (*i < header.len()).then_some(*i),
            ColumnRef::Name(name) => header.iter().position(|h| h == name),
        };
        match index {
            Some(i) if !resolved.contains(&i) => resolved.push(i),
            Some(_) => {}
            None => unresolved.push(selector.to_string()),
        }
    }

    (resolved, unresolved)
}

/// Read a cell's text as a number after removing thousands separators and
/// surrounding whitespace. Blank, unparseable, and non-finite values give
/// `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce every data cell of the selected columns in place.
///
/// Rows too short to hold a selected column are left alone. Cells that do not
/// convert become [`CellValue::Missing`]; they never produce an error.
pub fn normalize_columns(table: &mut CombinedTable, selectors: &[ColumnRef]) -> NormalizeSummary {
    let (columns, unresolved) = resolve_columns(&table.header, selectors);
    let mut failures = vec![0usize; columns.len()];

    for row in &mut table.rows {
        for (slot, &col) in columns.iter().enumerate() {
            let Some(cell) = row.get_mut(col) else {
                continue;
            };
            let (value, failed) = match cell {
                CellValue::Text(raw) => match coerce_number(raw) {
                    Some(n) => (CellValue::Number(n), false),
                    None => (CellValue::Missing, !raw.trim().is_empty()),
                },
                CellValue::Number(n) => (CellValue::Number(*n), false),
                CellValue::Missing => (CellValue::Missing, false),
            };
            *cell = value;
            if failed && let Some(count) = failures.get_mut(slot) {
                *count += 1;
            }
        }
    }

    let warnings = columns
        .iter()
        .zip(&failures)
        .filter(|(_, failed)| **failed > 0)
        .map(|(&col, &failed)| {
            let warning = CoercionWarning {
                column: column_label(&table.header, col),
                failed,
            };
            tracing::warn!("{warning}");
            warning
        })
        .collect();

    for selector in &unresolved {
        tracing::warn!(column = %selector, "numeric column not found in header");
    }

    NormalizeSummary {
        columns,
        warnings,
        unresolved,
    }
}

fn column_label(header: &[String], col: usize) -> String {
    match header.get(col) {
        Some(name) => format!("'{name}' ({})", column_letter(col)),
        None => column_letter(col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1,234"), Some(1234.0));
        assert_eq!(coerce_number("  1,234,567.5 "), Some(1_234_567.5));
        assert_eq!(coerce_number("-42"), Some(-42.0));
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("   "), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn test_resolve_mixed_selectors() {
        let header: Vec<String> = ["id", "amount", "note"].iter().map(|s| (*s).to_owned()).collect();
        let selectors = vec![
            ColumnRef::Name("amount".to_owned()),
            ColumnRef::Index(0),
            ColumnRef::Index(1),
            ColumnRef::Index(14),
            ColumnRef::Name("Amount".to_owned()),
        ];
        let (resolved, unresolved) = resolve_columns(&header, &selectors);
        assert_eq!(resolved, vec![1, 0]);
        assert_eq!(unresolved, vec!["#14".to_owned(), "Amount".to_owned()]);
    }
}
