//! # sheetmerge command-line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize logging (files + stderr, stderr only as fallback)
//!   │
//!   ├─> If command provided:
//!   │   └─> Execute it (combine / preview)
//!   │
//!   └─> Otherwise:
//!       └─> Print help
//! ```
//!
//! ```bash
//! sheetmerge combine jan.txt feb.txt mar.txt -o Combined.xlsx
//! sheetmerge combine *.csv -d comma -n Amount -n "#14" -o - > Combined.xlsx
//! sheetmerge preview jan.txt feb.txt --rows 10
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // User-facing output lives in the binary

mod cli;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Err(e) = sheetmerge::logging::init()
        && sheetmerge::logging::init_console().is_ok()
    {
        tracing::warn!("File logging unavailable, logging to stderr only: {e:#}");
    }

    if let Some(command) = cli.command {
        return cli::run_command(command);
    }

    cli::Cli::command().print_help()?;
    Ok(())
}
