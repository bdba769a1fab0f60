//! Calamine-backed workbook adapter implementing [`RowSource`].

use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::{ConvertError, ConvertResult};
use crate::source::{RowCursor, RowSource};
use crate::types::CellType;

/// An xlsx workbook decoded into per-sheet snapshots.
///
/// Calamine materializes each worksheet's used range up front; the snapshots
/// are shared into cursors via [`Arc`], so every pipeline pass gets its own
/// fresh cursor without re-decoding the container.
pub struct XlsxSource {
    sheets: Vec<(String, Arc<Range<Data>>)>,
}

impl XlsxSource {
    /// Decodes a workbook from a seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> ConvertResult<Self> {
        let mut workbook = Xlsx::new(reader).map_err(calamine::Error::from)?;
        let sheets = workbook
            .worksheets()
            .into_iter()
            .map(|(name, range)| (name, Arc::new(range)))
            .collect();
        Ok(Self { sheets })
    }

    /// Decodes a workbook held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> ConvertResult<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Buffers a non-seekable stream (e.g. stdin) fully, then decodes it.
    ///
    /// The xlsx container is a zip archive whose directory sits at the end of
    /// the file, so decoding needs the whole stream anyway.
    pub fn from_stream<R: Read>(mut reader: R) -> ConvertResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes)
    }

    fn sheet(&self, name: &str) -> ConvertResult<&Arc<Range<Data>>> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, range)| range)
            .ok_or_else(|| ConvertError::SheetNotFound {
                sheet: name.to_string(),
                available: self.sheet_names(),
            })
    }
}

impl RowSource for XlsxSource {
    type Cursor = XlsxRowCursor;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn open_rows(&self, sheet: &str) -> ConvertResult<XlsxRowCursor> {
        Ok(XlsxRowCursor::new(Arc::clone(self.sheet(sheet)?)))
    }

    fn cell_type(&self, sheet: &str, row: u32, col: u16) -> ConvertResult<CellType> {
        let range = self.sheet(sheet)?;
        let data = row
            .checked_sub(1)
            .zip(u32::from(col).checked_sub(1))
            .and_then(|address| range.get_value(address));
        Ok(data.map_or(CellType::Unset, cell_type_of))
    }
}

/// Forward cursor over one sheet snapshot, visiting physical rows from row 1.
///
/// Calamine ranges cover only a sheet's used area; a sheet whose content
/// starts below row 1 still yields the leading rows (as empty) so that row
/// positions stay physical and line up with [`RowSource::cell_type`] lookups.
pub struct XlsxRowCursor {
    range: Arc<Range<Data>>,
    /// Next physical row to visit, 0-based.
    next_row: u32,
    /// Last used row, 0-based inclusive; `None` for an empty sheet.
    rows_end: Option<u32>,
    current: Option<Vec<String>>,
}

impl XlsxRowCursor {
    fn new(range: Arc<Range<Data>>) -> Self {
        let rows_end = range.end().map(|(row, _)| row);
        Self {
            range,
            next_row: 0,
            rows_end,
            current: None,
        }
    }
}

impl RowCursor for XlsxRowCursor {
    fn advance(&mut self) -> ConvertResult<bool> {
        let Some(end) = self.rows_end else {
            return Ok(false);
        };
        if self.next_row > end {
            return Ok(false);
        }
        self.current = Some(stringify_row(&self.range, self.next_row));
        self.next_row += 1;
        Ok(true)
    }

    fn columns(&mut self) -> ConvertResult<Vec<String>> {
        Ok(self.current.take().unwrap_or_default())
    }

    fn close(&mut self) -> ConvertResult<()> {
        // The snapshot is in memory; there is no handle to release.
        Ok(())
    }
}

/// Raw string cells for one physical row, padded from column A and trimmed of
/// trailing empties, so ragged rows keep their physical width.
fn stringify_row(range: &Range<Data>, row: u32) -> Vec<String> {
    let Some((_, end_col)) = range.end() else {
        return Vec::new();
    };
    let mut cells: Vec<String> = (0..=end_col)
        .map(|col| {
            range
                .get_value((row, col))
                .map_or_else(String::new, cell_to_string)
        })
        .collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

/// Convert a calamine cell to a raw string (strings pass through verbatim,
/// everything else via `Display`).
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_type_of(cell: &Data) -> CellType {
    match cell {
        Data::Empty => CellType::Unset,
        Data::String(_) => CellType::SharedString,
        Data::Float(_) | Data::Int(_) => CellType::Number,
        Data::Bool(_) => CellType::Bool,
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => CellType::Date,
        Data::Error(_) => CellType::Error,
    }
}
