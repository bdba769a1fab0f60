//! Abstract row-source seam between the pipeline and the workbook decoder.

use crate::error::ConvertResult;
use crate::types::CellType;

/// Largest column count a [`RowSource`] can address (`u16` column positions).
pub const MAX_COLUMNS: usize = u16::MAX as usize;

/// A decoded workbook that can hand out row cursors and cell-type lookups.
///
/// Each pipeline pass opens its own cursor: header resolution, sample
/// resolution, and record assembly each request a fresh [`RowCursor`] over the
/// same sheet. Cursors are one-shot and never rewound.
pub trait RowSource {
    /// Cursor type produced by [`RowSource::open_rows`].
    type Cursor: RowCursor;

    /// Worksheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Opens a fresh cursor positioned before the sheet's first physical row.
    fn open_rows(&self, sheet: &str) -> ConvertResult<Self::Cursor>;

    /// Declared cell type at a 1-based (row, column) address.
    ///
    /// Addresses outside the sheet's used range report [`CellType::Unset`].
    fn cell_type(&self, sheet: &str, row: u32, col: u16) -> ConvertResult<CellType>;
}

/// One-shot forward cursor over a sheet's physical rows.
pub trait RowCursor {
    /// Advances to the next physical row; `Ok(false)` once the sheet is exhausted.
    fn advance(&mut self) -> ConvertResult<bool>;

    /// Raw cell values of the current row, in column order.
    ///
    /// Valid once per successful [`RowCursor::advance`].
    fn columns(&mut self) -> ConvertResult<Vec<String>>;

    /// Releases the cursor's hold on the source. The row sequencer calls this
    /// exactly once, on exhaustion, error, or early consumer stop.
    fn close(&mut self) -> ConvertResult<()>;
}
