//! # sheetmerge - combine delimited text files into one workbook
//!
//! sheetmerge takes several delimited text files that share a column layout,
//! stacks their rows under the first file's header, drops header rows that
//! later files repeat, converts selected columns to numbers, and writes the
//! result as a single-sheet `.xlsx` workbook held in memory.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetmerge::combiner::{RunOutcome, SourceFile, run};
//! use sheetmerge::config::{ColumnRef, CombineConfig};
//! use std::path::Path;
//!
//! # fn example() -> sheetmerge::error::Result<()> {
//! let sources = vec![
//!     SourceFile::from_path(Path::new("jan.txt"))?,
//!     SourceFile::from_path(Path::new("feb.txt"))?,
//! ];
//! let config = CombineConfig {
//!     numeric_columns: vec![ColumnRef::Name("Amount".to_owned())],
//!     ..Default::default()
//! };
//!
//! match run(&sources, &config)? {
//!     RunOutcome::Delivered { delivery, report } => {
//!         println!("{}", report.success_message());
//!         std::fs::write(&delivery.file_name, &delivery.bytes)?;
//!     }
//!     RunOutcome::NoData { .. } => println!("nothing to export"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`combiner`]: parsing, header deduplication, concatenation, numeric coercion
//! - [`export`]: workbook serialization
//! - [`config`]: run settings and column selectors
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing setup for the binary
//!
//! ## Failure Model
//!
//! A run keeps going whenever it can. Rows with the wrong number of fields
//! are skipped, a file that cannot be decoded is reported by name and left
//! out, and a cell that will not convert to a number is left blank. Only an
//! invalid configuration or a writer failure is returned as an error; "no
//! data" is a normal [`combiner::RunOutcome`].

#![warn(clippy::all, rust_2018_idioms)]

pub mod combiner;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod utils;
