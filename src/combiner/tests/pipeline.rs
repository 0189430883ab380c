use super::{pipe_config, text_row};
use crate::combiner::*;
use crate::config::ColumnRef;

fn source(name: &str, text: &str) -> SourceFile {
    SourceFile::new(name, text.as_bytes())
}

fn numbers(values: &[f64]) -> Row {
    values.iter().map(|v| CellValue::Number(*v)).collect()
}

#[test]
fn test_two_pipe_files_combine_in_order() {
    let sources = vec![
        source("file1.txt", "A|B\n1|2\n"),
        source("file2.txt", "A|B\n3|4\n5|6\n"),
    ];
    let config = pipe_config(vec![ColumnRef::Index(0), ColumnRef::Index(1)]);

    let outcome = combine_sources(&sources, &config);

    assert_eq!(outcome.table.header, vec!["A".to_owned(), "B".to_owned()]);
    assert_eq!(
        outcome.table.rows,
        vec![
            numbers(&[1.0, 2.0]),
            numbers(&[3.0, 4.0]),
            numbers(&[5.0, 6.0])
        ]
    );
    assert_eq!(outcome.report.files_combined(), 2);
    assert_eq!(outcome.numeric_columns, vec![0, 1]);
}

#[test]
fn test_restated_header_row_contributes_nothing() {
    let sources = vec![
        source("file1.txt", "A|B\n1|2\n"),
        source("file2.txt", "A|B\nA|B\n5|6\n"),
    ];
    let outcome = combine_sources(&sources, &pipe_config(Vec::new()));

    assert_eq!(
        outcome.table.rows,
        vec![text_row(&["1", "2"]), text_row(&["5", "6"])]
    );
    assert!(outcome.report.files[1].header_dropped);
}

#[test]
fn test_near_header_row_is_kept() {
    let sources = vec![
        source("file1.txt", "A|B\n1|2\n"),
        source("file2.txt", "A|B\nA|b\n5|6\n"),
    ];
    let outcome = combine_sources(&sources, &pipe_config(Vec::new()));

    assert_eq!(outcome.table.row_count(), 3);
    assert_eq!(outcome.table.rows[1], text_row(&["A", "b"]));
    assert!(!outcome.report.files[1].header_dropped);
}

#[test]
fn test_coercion_failures_become_missing() {
    let sources = vec![source(
        "amounts.txt",
        "Amount|Note\n1,234|a\nabc|b\n|c\n 2,000.50 |d\n",
    )];
    let outcome = combine_sources(&sources, &pipe_config(vec![ColumnRef::Index(0)]));

    let amounts: Vec<&CellValue> = outcome.table.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(
        amounts,
        vec![
            &CellValue::Number(1234.0),
            &CellValue::Missing,
            &CellValue::Missing,
            &CellValue::Number(2000.5)
        ]
    );
    // Columns outside the selection stay text.
    assert_eq!(outcome.table.rows[0][1], CellValue::text("a"));

    // Only the non-blank failure is counted.
    assert_eq!(
        outcome.report.coercion_warnings,
        vec![CoercionWarning {
            column: "'Amount' (A)".to_owned(),
            failed: 1,
        }]
    );
}

#[test]
fn test_name_addressed_columns() {
    let sources = vec![source("f.txt", "Id|Total|Code\n1|1,500|0042\n")];
    let config = pipe_config(vec![
        ColumnRef::Name("Total".to_owned()),
        ColumnRef::Name("Missing".to_owned()),
    ]);
    let outcome = combine_sources(&sources, &config);

    assert_eq!(
        outcome.table.rows[0],
        vec![
            CellValue::text("1"),
            CellValue::Number(1500.0),
            CellValue::text("0042")
        ]
    );
    assert_eq!(outcome.report.unresolved_columns, vec!["Missing".to_owned()]);
}

#[test]
fn test_default_columns_skip_out_of_range_indices() {
    let sources = vec![source("f.txt", "A|B|C\n1|2|x\n")];
    let outcome = combine_sources(&sources, &pipe_config(vec![
        ColumnRef::Index(0),
        ColumnRef::Index(1),
        ColumnRef::Index(14),
        ColumnRef::Index(15),
    ]));

    assert_eq!(outcome.numeric_columns, vec![0, 1]);
    assert_eq!(
        outcome.table.rows[0],
        vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::text("x")
        ]
    );
    assert_eq!(
        outcome.report.unresolved_columns,
        vec!["#14".to_owned(), "#15".to_owned()]
    );
}

#[test]
fn test_bad_file_is_reported_and_others_survive() {
    let sources = vec![
        source("good1.txt", "A|B\n1|2\n"),
        SourceFile::new("broken.txt", b"A|B\n\xFF\xFE|2\n".to_vec()),
        source("good2.txt", "A|B\n3|4\n"),
    ];
    let outcome = combine_sources(&sources, &pipe_config(Vec::new()));

    assert_eq!(outcome.table.row_count(), 2);
    assert_eq!(outcome.report.files_combined(), 2);
    assert_eq!(outcome.report.file_errors.len(), 1);
    assert_eq!(outcome.report.file_errors[0].file, "broken.txt");
    assert!(
        outcome.report.file_errors[0]
            .to_string()
            .starts_with("Error in broken.txt:")
    );
}

#[test]
fn test_row_count_is_sum_of_files() {
    let sources = vec![
        source("a.txt", "X|Y\n1|2\n3|4\n"),
        source("b.txt", "X|Y\nX|Y\n5|6\n7|8\n9|10\n"),
        source("c.txt", ""),
        source("d.txt", "X|Y\n11|12\n"),
    ];
    let outcome = combine_sources(&sources, &pipe_config(Vec::new()));

    let expected: usize = outcome.report.files.iter().map(|f| f.rows_appended).sum();
    assert_eq!(outcome.table.row_count(), expected);
    assert_eq!(expected, 6);

    let first_cells: Vec<&str> = outcome
        .table
        .rows
        .iter()
        .filter_map(|r| r[0].as_text())
        .collect();
    assert_eq!(first_cells, vec!["1", "3", "5", "7", "9", "11"]);
}

#[test]
fn test_rerun_is_deterministic() {
    let sources = vec![
        source("a.txt", "A|B\n1,000|x\n"),
        source("b.txt", "A|B\n2|y\n"),
    ];
    let config = pipe_config(vec![ColumnRef::Index(0)]);
    let first = combine_sources(&sources, &config);
    let second = combine_sources(&sources, &config);
    assert_eq!(first, second);
}

#[test]
fn test_run_without_data_reports_no_data() {
    let sources = vec![source("a.txt", "A|B\n"), source("b.txt", "")];
    let outcome = run(&sources, &pipe_config(Vec::new())).unwrap();
    assert!(matches!(outcome, RunOutcome::NoData { .. }));
    assert_eq!(outcome.report().files_combined(), 2);
}

#[test]
fn test_run_delivers_workbook() {
    let sources = vec![source("a.txt", "A|B\n1|2\n")];
    let outcome = run(&sources, &pipe_config(vec![ColumnRef::Index(0)])).unwrap();
    match outcome {
        RunOutcome::Delivered { delivery, report } => {
            assert_eq!(delivery.file_name, "Combined.xlsx");
            assert!(!delivery.bytes.is_empty());
            assert_eq!(report.files_combined(), 1);
        }
        RunOutcome::NoData { .. } => panic!("expected a workbook"),
    }
}

#[test]
fn test_export_outcome_keeps_caller_report() {
    let sources = vec![source("a.txt", "A|B\n1|2\n"), source("b.txt", "A|B\n3|4\n")];
    let config = pipe_config(vec![ColumnRef::Index(0)]);

    let mut outcome = combine_sources(&sources, &config);
    assert_eq!(outcome.table.row_count(), 2);
    outcome.report.file_errors.push(FileError {
        file: "c.txt".to_owned(),
        message: "could not read file".to_owned(),
    });

    match export_outcome(outcome, &config).unwrap() {
        RunOutcome::Delivered { delivery, report } => {
            assert!(delivery.bytes.starts_with(b"PK"));
            assert_eq!(report.files_combined(), 2);
            assert_eq!(report.file_errors.len(), 1);
            assert_eq!(report.file_errors[0].file, "c.txt");
        }
        RunOutcome::NoData { .. } => panic!("expected a workbook"),
    }
}

#[test]
fn test_export_outcome_without_rows_is_no_data() {
    let config = pipe_config(Vec::new());
    let outcome = combine_sources(&[source("a.txt", "A|B\n")], &config);
    let result = export_outcome(outcome, &config).unwrap();
    assert!(matches!(result, RunOutcome::NoData { .. }));
}

#[test]
fn test_export_outcome_checks_config() {
    let mut config = pipe_config(Vec::new());
    let outcome = combine_sources(&[source("a.txt", "A|B\n1|2\n")], &config);
    config.sheet_name = "History".to_owned();
    assert!(export_outcome(outcome, &config).is_err());
}
