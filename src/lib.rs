//! `xlsx2jsonl` converts one worksheet of an xlsx workbook into line-delimited
//! JSON: one JSON object per data row, keyed by the sheet's header row.
//!
//! The first row after `skip_rows` is the header; the row after that is the
//! sample row. The sample row's per-column cell types, as stored in the
//! workbook, decide how every later cell in that column converts:
//!
//! - numeric cells parse as 64-bit floats (integral values serialize as JSON
//!   integers, so a cell holding `7` emits `7`)
//! - boolean cells parse as booleans
//! - untyped cells are inferred per value: empty → `null`, then float, bool,
//!   and integer parses in that order, falling back to the raw string
//! - everything else (dates, errors, formulas, strings) passes through as the
//!   raw string
//!
//! Raw mode skips conversion entirely and emits every value as a string.
//!
//! ## Quick example: convert a workbook
//!
//! ```no_run
//! use std::fs::File;
//! use std::io;
//!
//! use xlsx2jsonl::{ConvertOptions, XlsxSource, convert};
//!
//! # fn main() -> Result<(), xlsx2jsonl::ConvertError> {
//! let source = XlsxSource::from_reader(File::open("people.xlsx")?)?;
//! // Defaults: sheet "Sheet1", no skipped rows, typed output.
//! convert(&source, &ConvertOptions::default(), io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```
//!
//! Callers that want the records themselves, rather than serialized lines,
//! can use [`pipeline::typed_records`] / [`pipeline::raw_records`] directly;
//! both return lazy iterators that pull rows on demand. A non-xlsx backend
//! can plug in behind [`source::RowSource`].
//!
//! ## Modules
//!
//! - [`pipeline`]: row sequencing, header/sample resolution, record assembly,
//!   and the JSON-lines sink
//! - [`source`]: row-source traits the pipeline consumes
//! - [`xlsx`]: calamine-backed workbook adapter
//! - [`types`]: rows, cell-type tags, typed value conversion
//! - [`error`]: error type used across the pipeline

pub mod error;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod xlsx;

pub use error::{ConvertError, ConvertResult};
pub use pipeline::{ConvertOptions, DEFAULT_SHEET, Mode, convert};
pub use source::{RowCursor, RowSource};
pub use types::{CellType, Row, TypedValue};
pub use xlsx::XlsxSource;
