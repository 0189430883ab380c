use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use sheetmerge::combiner::{
    CombineOutcome, CombineReport, FileError, RunOutcome, SourceFile, combine_sources, export_outcome,
};
use sheetmerge::config::{ColumnRef, CombineConfig, Delimiter};
use sheetmerge::error::SheetmergeError;
use sheetmerge::export::Delivery;
use sheetmerge::utils::render_preview;
use std::io::Write as _;
use std::path::{Path, PathBuf};

const STDOUT_MARKER: &str = "-";

#[derive(Parser)]
#[command(
    name = "sheetmerge",
    about = "Combine delimited text files into one Excel workbook"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine files and write the workbook
    Combine {
        /// Files to combine, in order. The first file's header is used.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path, or "-" for stdout. Defaults to the configured file name.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the first N combined rows
        #[arg(long, value_name = "N")]
        preview: Option<usize>,

        #[command(flatten)]
        options: CombineArgs,
    },
    /// Combine files and print the result without writing a workbook
    Preview {
        /// Files to combine, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of rows to show
        #[arg(long, default_value_t = 20)]
        rows: usize,

        #[command(flatten)]
        options: CombineArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CombineArgs {
    /// Field delimiter: comma, pipe, tab or semicolon
    #[arg(short, long)]
    pub delimiter: Option<Delimiter>,

    /// Column to convert to numbers: a header name, or #N for a zero-based
    /// index. Repeatable; replaces the configured columns.
    #[arg(short = 'n', long = "numeric-column", value_name = "COLUMN")]
    pub numeric_columns: Vec<ColumnRef>,

    /// Convert no columns to numbers
    #[arg(long, conflicts_with = "numeric_columns")]
    pub no_numeric: bool,

    /// Keep rows that repeat the header in later files
    #[arg(long)]
    pub keep_repeated_headers: bool,

    /// Worksheet name
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CombineArgs {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn resolve(&self) -> Result<CombineConfig> {
        let mut config = match &self.config {
            Some(path) => CombineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CombineConfig::default(),
        };

        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.no_numeric {
            config.numeric_columns.clear();
        } else if !self.numeric_columns.is_empty() {
            config.numeric_columns.clone_from(&self.numeric_columns);
        }
        if self.keep_repeated_headers {
            config.dedupe_headers = false;
        }
        if let Some(name) = &self.sheet_name {
            config.sheet_name.clone_from(name);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Combine {
            files,
            output,
            preview,
            options,
        } => handle_combine(&files, output, preview, &options),
        Commands::Preview {
            files,
            rows,
            options,
        } => handle_preview(&files, rows, &options),
    }
}

fn handle_combine(
    files: &[PathBuf],
    output: Option<PathBuf>,
    preview: Option<usize>,
    options: &CombineArgs,
) -> Result<()> {
    let config = options.resolve()?;
    let output = output.unwrap_or_else(|| PathBuf::from(&config.file_name));
    let to_stdout = output.as_os_str() == STDOUT_MARKER;
    let outcome = combine_files(files, &config);

    if let Some(limit) = preview {
        if to_stdout {
            tracing::warn!("--preview ignored while writing the workbook to stdout");
        } else {
            print!("{}", render_preview(&outcome.table, limit));
        }
    }

    match export_outcome(outcome, &config)? {
        RunOutcome::Delivered { delivery, report } => {
            print_report(&report);
            if to_stdout {
                std::io::stdout()
                    .lock()
                    .write_all(&delivery.bytes)
                    .context("Failed to write workbook to stdout")?;
            } else {
                write_delivery(&delivery, &output)?;
                eprintln!(
                    "Saved {} ({} bytes, {})",
                    output.display(),
                    delivery.bytes.len(),
                    delivery.mime_type
                );
            }
            Ok(())
        }
        RunOutcome::NoData { report } => {
            print_report(&report);
            Err(SheetmergeError::NoData.into())
        }
    }
}

fn handle_preview(files: &[PathBuf], rows: usize, options: &CombineArgs) -> Result<()> {
    let config = options.resolve()?;
    let outcome = combine_files(files, &config);

    print_report(&outcome.report);
    if outcome.table.is_empty() {
        return Err(SheetmergeError::NoData.into());
    }
    print!("{}", render_preview(&outcome.table, rows));
    Ok(())
}

/// Read and combine `files`. A path that cannot be read is reported like a
/// file that cannot be parsed, and the rest are still combined.
fn combine_files(files: &[PathBuf], config: &CombineConfig) -> CombineOutcome {
    let (sources, mut file_errors) = read_sources(files);
    let mut outcome = combine_sources(&sources, config);
    file_errors.append(&mut outcome.report.file_errors);
    outcome.report.file_errors = file_errors;
    outcome
}

fn read_sources(files: &[PathBuf]) -> (Vec<SourceFile>, Vec<FileError>) {
    let mut sources = Vec::with_capacity(files.len());
    let mut errors = Vec::new();
    for path in files {
        match SourceFile::from_path(path) {
            Ok(source) => sources.push(source),
            Err(e) => {
                let file = path.display().to_string();
                tracing::error!(file = %file, "{e}");
                errors.push(FileError {
                    file,
                    message: format!("could not read file: {e}"),
                });
            }
        }
    }
    (sources, errors)
}

fn write_delivery(delivery: &Delivery, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &delivery.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// User-facing signals go to stderr so stdout can carry the workbook.
fn print_report(report: &CombineReport) {
    for error in &report.file_errors {
        eprintln!("❌ {error}");
    }
    for file in &report.files {
        if file.skipped_rows > 0 {
            eprintln!(
                "⚠️ {}: skipped {} malformed rows",
                file.file, file.skipped_rows
            );
        }
    }
    for column in &report.unresolved_columns {
        eprintln!("⚠️ Numeric column {column} not found; left as text");
    }
    for warning in &report.coercion_warnings {
        eprintln!("⚠️ {warning}");
    }
    if report.files_combined() > 0 {
        eprintln!("✅ {}", report.success_message());
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "sheetmerge",
            "combine",
            "a.txt",
            "b.txt",
            "-d",
            "comma",
            "-n",
            "Amount",
            "-n",
            "#3",
            "--sheet-name",
            "Merged",
        ])
        .unwrap();

        let Some(Commands::Combine { files, options, .. }) = cli.command else {
            panic!("expected combine");
        };
        assert_eq!(files.len(), 2);

        let config = options.resolve().unwrap();
        assert_eq!(config.delimiter, Delimiter::Comma);
        assert_eq!(
            config.numeric_columns,
            vec![ColumnRef::Name("Amount".to_owned()), ColumnRef::Index(3)]
        );
        assert_eq!(config.sheet_name, "Merged");
    }

    #[test]
    fn test_no_numeric_clears_defaults() {
        let args = CombineArgs {
            no_numeric: true,
            ..Default::default()
        };
        assert!(args.resolve().unwrap().numeric_columns.is_empty());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combine.json");
        std::fs::write(
            &path,
            r#"{"delimiter": "comma", "numeric_columns": ["Total"], "sheet_name": "Q1"}"#,
        )
        .unwrap();

        let args = CombineArgs {
            config: Some(path),
            keep_repeated_headers: true,
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.delimiter, Delimiter::Comma);
        assert_eq!(config.numeric_columns, vec![ColumnRef::Name("Total".to_owned())]);
        assert_eq!(config.sheet_name, "Q1");
        assert!(!config.dedupe_headers);
    }

    #[test]
    fn test_combine_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "A|B\n1|2\n").unwrap();
        std::fs::write(&b, "A|B\n3|4\n").unwrap();
        let out = dir.path().join("out").join("Combined.xlsx");

        handle_combine(&[a, b], Some(out.clone()), None, &CombineArgs::default()).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_combine_without_data_fails() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "A|B\n").unwrap();
        let out = dir.path().join("Combined.xlsx");

        let err = handle_combine(&[a], Some(out.clone()), None, &CombineArgs::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("No data was combined"));
        assert!(!out.exists());
    }

    #[test]
    fn test_unreadable_path_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "A|B\n1|2\n").unwrap();
        let missing = dir.path().join("missing.txt");
        let out = dir.path().join("Combined.xlsx");

        let outcome = combine_files(&[a.clone(), missing.clone()], &CombineConfig::default());
        assert_eq!(outcome.report.files_combined(), 1);
        assert_eq!(outcome.table.row_count(), 1);
        assert_eq!(outcome.report.file_errors.len(), 1);
        assert_eq!(
            outcome.report.file_errors[0].file,
            missing.display().to_string()
        );

        handle_combine(&[a, missing], Some(out.clone()), None, &CombineArgs::default())
            .unwrap();
        assert!(std::fs::read(&out).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_directory_path_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let (sources, errors) = read_sources(&[dir.path().to_path_buf()]);
        assert!(sources.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Error in "));
    }
}
