//! Header and sample-row resolution.
//!
//! Each resolver makes its own pass over the sheet with a fresh cursor, so
//! later passes always start from the top.

use crate::error::{ConvertError, ConvertResult};
use crate::source::{MAX_COLUMNS, RowSource};
use crate::types::{Row, TypedValue};

use super::rows::RowIter;

/// Captures the header row: the first row yielded after skipping.
pub fn read_header<S: RowSource>(
    source: &S,
    sheet: &str,
    skip_rows: u32,
) -> ConvertResult<Vec<String>> {
    let mut rows = RowIter::new(source.open_rows(sheet)?, skip_rows);
    match rows.next() {
        Some(row) => Ok(row?.columns),
        None => Err(ConvertError::HeaderUnavailable {
            sheet: sheet.to_string(),
        }),
    }
}

/// Captures the sample row (the first data row after the header) together
/// with each column's declared cell type.
///
/// Types are looked up from the source at the sample row's true physical
/// position, so the lookup stays correct under any skip count.
pub fn read_sample<S: RowSource>(
    source: &S,
    sheet: &str,
    skip_rows: u32,
) -> ConvertResult<Vec<TypedValue>> {
    let rows = RowIter::new(source.open_rows(sheet)?, skip_rows);
    for (seen, row) in rows.enumerate() {
        let row = row?;
        if seen == 0 {
            // The header row; the sample is the one after it.
            continue;
        }
        return typed_values(source, sheet, &row);
    }
    Err(ConvertError::TooFewRows)
}

fn typed_values<S: RowSource>(source: &S, sheet: &str, row: &Row) -> ConvertResult<Vec<TypedValue>> {
    if row.columns.len() > MAX_COLUMNS {
        return Err(ConvertError::TooManyColumns {
            count: row.columns.len(),
        });
    }
    let mut values = Vec::with_capacity(row.columns.len());
    for (ix, raw) in row.columns.iter().enumerate() {
        let col = ix as u16 + 1;
        let cell_type = source.cell_type(sheet, row.index, col)?;
        values.push(TypedValue::new(raw.clone(), cell_type));
    }
    Ok(values)
}
