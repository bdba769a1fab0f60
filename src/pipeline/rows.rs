//! Lazy row sequencing over a [`RowCursor`].

use tracing::warn;

use crate::error::ConvertResult;
use crate::source::RowCursor;
use crate::types::Row;

/// Iterator over a sheet's physical rows after an initial skip.
///
/// Yields one `Result` per row and fuses after the first error or at
/// exhaustion. The wrapped cursor is closed exactly once: eagerly when the
/// sequence ends on its own, or on drop when the consumer stops early.
///
/// Rows consumed by the skip are not yielded, but they still advance the
/// 1-based physical position recorded in [`Row::index`]. A `RowIter` is
/// single-use; each pipeline pass builds a fresh one from a freshly opened
/// cursor.
pub struct RowIter<C: RowCursor> {
    cursor: Option<C>,
    skip_rows: u32,
    /// 1-based physical position of the next row the cursor will visit.
    next_physical: u32,
    skipped: bool,
}

impl<C: RowCursor> RowIter<C> {
    /// Wraps a freshly opened cursor, skipping `skip_rows` physical rows
    /// before the first yield.
    pub fn new(cursor: C, skip_rows: u32) -> Self {
        Self {
            cursor: Some(cursor),
            skip_rows,
            next_physical: 1,
            skipped: false,
        }
    }

    /// Ends the sequence and closes the cursor. Idempotent.
    fn finish(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(error) = cursor.close() {
                // A close failure must not displace an in-flight row error.
                warn!(%error, "failed to close row cursor");
            }
        }
    }
}

impl<C: RowCursor> Iterator for RowIter<C> {
    type Item = ConvertResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        if !self.skipped {
            while self.next_physical <= self.skip_rows {
                match cursor.advance() {
                    // Exhausted while skipping: silent truncation, not an error.
                    Ok(false) => {
                        self.finish();
                        return None;
                    }
                    Ok(true) => self.next_physical += 1,
                    Err(e) => {
                        self.finish();
                        return Some(Err(e));
                    }
                }
            }
            self.skipped = true;
        }

        match cursor.advance() {
            Ok(false) => {
                self.finish();
                None
            }
            Err(e) => {
                self.finish();
                Some(Err(e))
            }
            Ok(true) => {
                let index = self.next_physical;
                self.next_physical += 1;
                match cursor.columns() {
                    Ok(columns) => Some(Ok(Row { index, columns })),
                    Err(e) => {
                        self.finish();
                        Some(Err(e))
                    }
                }
            }
        }
    }
}

impl<C: RowCursor> Drop for RowIter<C> {
    fn drop(&mut self) {
        self.finish();
    }
}
