use crate::combiner::CombinedTable;

/// Spreadsheet column letters for a zero-based index: 0 → `A`, 25 → `Z`,
/// 26 → `AA`.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Renders the first `limit` data rows as an aligned text grid.
pub fn render_preview(table: &CombinedTable, limit: usize) -> String {
    let shown: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let width = shown
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);

    let mut col_widths = vec![0usize; width];
    for line in std::iter::once(&table.header).chain(&shown) {
        for (w, cell) in col_widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        col_widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{cell:<w$}")
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_owned()
    };

    let mut out = String::new();
    out.push_str(&format_line(&table.header));
    out.push('\n');
    out.push_str(
        &col_widths
            .iter()
            .map(|w| "-".repeat((*w).max(1)))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for line in &shown {
        out.push_str(&format_line(line));
        out.push('\n');
    }
    if table.row_count() > limit {
        out.push_str(&format!("... {} more rows\n", table.row_count() - limit));
    }
    out
}
