use thiserror::Error;

use crate::types::CellType;

/// Convenience result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned by conversion functions.
///
/// This is a single error enum shared across the workbook adapter, the row
/// pipeline, and the JSON-lines sink.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Underlying I/O error (e.g. reading the workbook stream, writing output).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook decoding error from the spreadsheet reader.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Record serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested worksheet does not exist in the workbook.
    #[error("worksheet '{sheet}' not found; workbook has {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// No row was left to serve as the header after skipping.
    #[error("unable to get header: sheet={sheet}")]
    HeaderUnavailable { sheet: String },

    /// The sheet ended before a sample row (the row after the header) appeared.
    #[error("too few rows: need a header row and at least one data row")]
    TooFewRows,

    /// The sample row has more columns than a cell address can name.
    #[error("too many columns: {count}")]
    TooManyColumns { count: usize },

    /// A data row's column count disagrees with the header count.
    #[error("invalid column count: column count={columns}, header count={headers}")]
    ColumnCountMismatch { columns: usize, headers: usize },

    /// The resolved type vector does not line up with the headers.
    #[error("header/type count mismatch: header count={headers}, type count={types}")]
    TypeVectorLengthMismatch { headers: usize, types: usize },

    /// A cell value could not be converted per its column's declared cell type.
    #[error("cannot convert {raw:?} as {cell_type:?}: {message}")]
    ConversionFailure {
        raw: String,
        cell_type: CellType,
        message: String,
    },

    /// Two failures from one run, e.g. a record error plus a flush error.
    #[error("{primary} (additionally: {secondary})")]
    Combined {
        primary: Box<ConvertError>,
        secondary: Box<ConvertError>,
    },
}

impl ConvertError {
    /// Merges a primary outcome with a follow-up outcome, keeping both errors
    /// when both failed.
    pub(crate) fn join(primary: ConvertResult<()>, followup: ConvertResult<()>) -> ConvertResult<()> {
        match (primary, followup) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(primary), Err(secondary)) => Err(ConvertError::Combined {
                primary: Box::new(primary),
                secondary: Box::new(secondary),
            }),
        }
    }
}
