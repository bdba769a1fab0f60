//! The conversion pipeline: row sequencing, header and sample resolution,
//! record assembly, and the JSON-lines sink.
//!
//! A typed conversion makes three independent passes over the sheet (header,
//! sample, assembly), a raw conversion two; each pass opens its own cursor.
//! No cursor is ever rewound or reused, matching the one-shot contract of
//! [`crate::source::RowCursor`].

pub mod assemble;
pub mod resolve;
pub mod rows;
pub mod sink;

use std::io::Write;

use crate::error::ConvertResult;
use crate::source::RowSource;

pub use assemble::{RawRecord, RawRecords, TypedRecord, TypedRecords, raw_records, typed_records};
pub use resolve::{read_header, read_sample};
pub use rows::RowIter;
pub use sink::write_jsonl;

/// Conventional name of a workbook's first sheet.
pub const DEFAULT_SHEET: &str = "Sheet1";

/// Output mode for assembled records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every value is emitted as its original string.
    Raw,
    /// Values are converted per the sample row's declared cell types.
    #[default]
    Typed,
}

/// Options controlling a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Worksheet to convert.
    pub sheet_name: String,
    /// Leading physical rows to ignore before the header row.
    pub skip_rows: u32,
    /// Raw or typed output.
    pub mode: Mode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET.to_string(),
            skip_rows: 0,
            mode: Mode::default(),
        }
    }
}

/// Converts one worksheet to line-delimited JSON on `writer`.
pub fn convert<S, W>(source: &S, options: &ConvertOptions, writer: W) -> ConvertResult<()>
where
    S: RowSource,
    W: Write,
{
    let sheet = options.sheet_name.as_str();
    match options.mode {
        Mode::Raw => write_jsonl(raw_records(source, sheet, options.skip_rows)?, writer),
        Mode::Typed => write_jsonl(typed_records(source, sheet, options.skip_rows)?, writer),
    }
}


#[cfg(test)]
mod tests {
    use super::{ConvertOptions, Mode, convert};
    use crate::pipeline::fixtures::StaticSheet;
    use crate::types::CellType;

    fn people() -> StaticSheet {
        StaticSheet::new(vec![
            vec!["id", "name", "score"],
            vec!["1", "Alice", "9.5"],
            vec!["2", "Bob", "7"],
        ])
        .with_types(vec![
            vec![CellType::SharedString; 3],
            vec![CellType::Number, CellType::SharedString, CellType::Number],
            vec![CellType::Number, CellType::SharedString, CellType::Number],
        ])
    }

    #[test]
    fn typed_conversion_produces_one_object_per_data_row() {
        let mut out = Vec::new();
        convert(&people(), &ConvertOptions::default(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"id\":1,\"name\":\"Alice\",\"score\":9.5}\n{\"id\":2,\"name\":\"Bob\",\"score\":7}\n"
        );
    }

    #[test]
    fn raw_conversion_keeps_every_value_a_string() {
        let options = ConvertOptions {
            mode: Mode::Raw,
            ..ConvertOptions::default()
        };
        let mut out = Vec::new();
        convert(&people(), &options, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"id\":\"1\",\"name\":\"Alice\",\"score\":\"9.5\"}\n{\"id\":\"2\",\"name\":\"Bob\",\"score\":\"7\"}\n"
        );
    }

    #[test]
    fn unknown_sheet_fails_before_writing() {
        let options = ConvertOptions {
            sheet_name: "Missing".to_string(),
            ..ConvertOptions::default()
        };
        let mut out = Vec::new();

        assert!(convert(&people(), &options, &mut out).is_err());
        assert!(out.is_empty());
    }
}
