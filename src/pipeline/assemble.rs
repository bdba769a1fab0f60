//! Record assembly: zipping data rows against headers, and for typed output
//! against the resolved per-column cell types.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ConvertError, ConvertResult};
use crate::source::{RowCursor, RowSource};
use crate::types::{CellType, Row, TypedValue};

use super::resolve::{read_header, read_sample};
use super::rows::RowIter;

/// A raw-mode record: header name → raw cell string, in header order.
pub type RawRecord = IndexMap<String, String>;

/// A typed-mode record: header name → converted JSON value, in header order.
pub type TypedRecord = Map<String, Value>;

/// Resolves headers (one pass) and assembles raw records over a second pass.
pub fn raw_records<S: RowSource>(
    source: &S,
    sheet: &str,
    skip_rows: u32,
) -> ConvertResult<RawRecords<S::Cursor>> {
    let headers = read_header(source, sheet, skip_rows)?;
    let rows = RowIter::new(source.open_rows(sheet)?, skip_rows);
    Ok(RawRecords::new(rows, headers))
}

/// Resolves headers and sample cell types (two passes) and assembles typed
/// records over a third pass.
pub fn typed_records<S: RowSource>(
    source: &S,
    sheet: &str,
    skip_rows: u32,
) -> ConvertResult<TypedRecords<S::Cursor>> {
    let headers = read_header(source, sheet, skip_rows)?;
    let sample = read_sample(source, sheet, skip_rows)?;
    let types = sample.into_iter().map(|value| value.cell_type).collect();
    let rows = RowIter::new(source.open_rows(sheet)?, skip_rows);
    TypedRecords::new(rows, headers, types)
}

/// Iterator of raw records over one assembly pass.
///
/// The first sequencer row (the header again) is skipped without being
/// emitted; every data row must match the header count exactly. Fuses after
/// the first error.
pub struct RawRecords<C: RowCursor> {
    rows: RowIter<C>,
    headers: Vec<String>,
    header_skipped: bool,
    done: bool,
}

impl<C: RowCursor> RawRecords<C> {
    /// Assembles records from an already-resolved header set and a fresh
    /// sequencer pass, which must use the same skip count header resolution
    /// used.
    pub fn new(rows: RowIter<C>, headers: Vec<String>) -> Self {
        Self {
            rows,
            headers,
            header_skipped: false,
            done: false,
        }
    }

    /// Next data row, stepping over the header row once.
    fn pull(&mut self) -> Option<ConvertResult<Row>> {
        pull_data_row(&mut self.rows, &mut self.header_skipped, &mut self.done)
    }
}

impl<C: RowCursor> Iterator for RawRecords<C> {
    type Item = ConvertResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.pull()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        if let Err(e) = check_column_count(&row, &self.headers) {
            self.done = true;
            return Some(Err(e));
        }
        let record: RawRecord = self.headers.iter().cloned().zip(row.columns).collect();
        Some(Ok(record))
    }
}

/// Iterator of typed records over one assembly pass.
///
/// Shares the raw assembler's shape, then converts each cell per its column's
/// resolved cell type.
pub struct TypedRecords<C: RowCursor> {
    rows: RowIter<C>,
    headers: Vec<String>,
    types: Vec<CellType>,
    header_skipped: bool,
    done: bool,
}

impl<C: RowCursor> TypedRecords<C> {
    /// Assembles typed records; fails before any row is consumed when the
    /// type vector does not line up with the headers.
    pub fn new(rows: RowIter<C>, headers: Vec<String>, types: Vec<CellType>) -> ConvertResult<Self> {
        if headers.len() != types.len() {
            return Err(ConvertError::TypeVectorLengthMismatch {
                headers: headers.len(),
                types: types.len(),
            });
        }
        Ok(Self {
            rows,
            headers,
            types,
            header_skipped: false,
            done: false,
        })
    }

    fn pull(&mut self) -> Option<ConvertResult<Row>> {
        pull_data_row(&mut self.rows, &mut self.header_skipped, &mut self.done)
    }
}

impl<C: RowCursor> Iterator for TypedRecords<C> {
    type Item = ConvertResult<TypedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.pull()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        if let Err(e) = check_column_count(&row, &self.headers) {
            self.done = true;
            return Some(Err(e));
        }

        let mut record = TypedRecord::with_capacity(self.headers.len());
        let cells = self.headers.iter().zip(row.columns).zip(&self.types);
        for ((header, raw), &cell_type) in cells {
            match TypedValue::new(raw, cell_type).convert() {
                Ok(value) => {
                    record.insert(header.clone(), value);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        Some(Ok(record))
    }
}

/// Shared stepping logic for both assemblers: skip the header row once, stop
/// permanently after the sequencer ends or any error was surfaced.
fn pull_data_row<C: RowCursor>(
    rows: &mut RowIter<C>,
    header_skipped: &mut bool,
    done: &mut bool,
) -> Option<ConvertResult<Row>> {
    if *done {
        return None;
    }
    loop {
        let row = match rows.next() {
            None => {
                *done = true;
                return None;
            }
            Some(Err(e)) => {
                *done = true;
                return Some(Err(e));
            }
            Some(Ok(row)) => row,
        };
        if !*header_skipped {
            *header_skipped = true;
            continue;
        }
        return Some(Ok(row));
    }
}

fn check_column_count(row: &Row, headers: &[String]) -> ConvertResult<()> {
    if row.columns.len() != headers.len() {
        return Err(ConvertError::ColumnCountMismatch {
            columns: row.columns.len(),
            headers: headers.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{TypedRecords, raw_records, typed_records};
    use crate::error::ConvertError;
    use crate::pipeline::fixtures::StaticSheet;
    use crate::pipeline::rows::RowIter;
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
    fn raw_records_pair_headers_with_cells_in_order() {
        let sheet = people();
        let records: Vec<_> = raw_records(&sheet, "Sheet1", 0)
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(records.len(), 2);
        let pairs: Vec<_> = records[0]
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("id", "1"), ("name", "Alice"), ("score", "9.5")]
        );
    }

    #[test]
    fn header_row_is_never_emitted() {
        let sheet = people();
        let records: Vec<_> = raw_records(&sheet, "Sheet1", 0)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert!(records.iter().all(|record| record["id"] != "id"));
    }

    #[test]
    fn column_count_mismatch_fuses_the_stream() {
        let sheet = StaticSheet::new(vec![
            vec!["id", "name"],
            vec!["1", "Alice"],
            vec!["2"],
            vec!["3", "Carol"],
        ]);
        let mut records = raw_records(&sheet, "Sheet1", 0).unwrap();

        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ColumnCountMismatch { columns: 1, headers: 2 }
        ));
        // The valid row after the ragged one is never reached.
        assert!(records.next().is_none());
    }

    #[test]
    fn typed_records_convert_cells_by_column_type() {
        let sheet = people();
        let records: Vec<_> = typed_records(&sheet, "Sheet1", 0)
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], json!(1));
        assert_eq!(records[0]["name"], json!("Alice"));
        assert_eq!(records[0]["score"], json!(9.5));
        assert_eq!(records[1]["score"], json!(7));
    }

    #[test]
    fn string_typed_columns_keep_digit_strings() {
        let sheet = StaticSheet::new(vec![vec!["code"], vec!["42"], vec!["43"]]).with_types(vec![
            vec![CellType::SharedString],
            vec![CellType::SharedString],
            vec![CellType::SharedString],
        ]);
        let records: Vec<_> = typed_records(&sheet, "Sheet1", 0)
            .unwrap()
            .map(Result::unwrap)
            .collect();

        // The column's declared type wins over the value's shape.
        assert_eq!(records[0]["code"], json!("42"));
        assert_eq!(records[1]["code"], json!("43"));
    }

    #[test]
    fn conversion_failure_fuses_the_stream() {
        let sheet = StaticSheet::new(vec![
            vec!["n"],
            vec!["1"],
            vec!["abc"],
            vec!["2"],
        ])
        .with_types(vec![
            vec![CellType::SharedString],
            vec![CellType::Number],
            vec![CellType::Number],
            vec![CellType::Number],
        ]);
        let mut records = typed_records(&sheet, "Sheet1", 0).unwrap();

        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::ConversionFailure { raw, .. } if raw == "abc"
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn type_vector_mismatch_fails_before_any_row() {
        let sheet = StaticSheet::new(vec![vec!["a", "b"], vec!["1", "2"]]);
        let rows = RowIter::new(sheet.open_cursor(), 0);

        let err = TypedRecords::new(
            rows,
            vec!["a".to_string(), "b".to_string()],
            vec![CellType::Number],
        )
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TypeVectorLengthMismatch { headers: 2, types: 1 }
        ));
        // The constructor error still releases the cursor it was handed.
        assert_eq!(sheet.closes.get(), 1);
    }

    #[test]
    fn fused_assembler_releases_its_cursor_on_drop() {
        let sheet = StaticSheet::new(vec![
            vec!["id", "name"],
            vec!["1"],
            vec!["2", "Bob"],
        ]);
        let mut records = raw_records(&sheet, "Sheet1", 0).unwrap();

        assert!(records.next().unwrap().is_err());
        assert_eq!(sheet.closes.get(), 1, "header pass already closed");
        drop(records);
        assert_eq!(sheet.closes.get(), 2);
    }

    #[test]
    fn assembly_uses_the_same_skip_as_resolution() {
        let sheet = StaticSheet::new(vec![
            vec!["junk", "junk"],
            vec!["id", "name"],
            vec!["1", "Alice"],
        ]);
        let records: Vec<_> = raw_records(&sheet, "Sheet1", 1)
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "1");
    }

    #[test]
    fn header_only_sheet_yields_no_raw_records() {
        let sheet = StaticSheet::new(vec![vec!["id", "name"]]);
        let mut records = raw_records(&sheet, "Sheet1", 0).unwrap();
        assert!(records.next().is_none());
    }
}
