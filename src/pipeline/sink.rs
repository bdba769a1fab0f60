//! Line-delimited JSON output.

use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::error::{ConvertError, ConvertResult};

/// Drains `records` into `writer` as line-delimited JSON, one object per line.
///
/// Serialization stops at the first failed record, but buffered output is
/// still flushed on the way out; when both a record error and a flush error
/// occur, they are surfaced together.
pub fn write_jsonl<I, T, W>(records: I, writer: W) -> ConvertResult<()>
where
    I: IntoIterator<Item = ConvertResult<T>>,
    T: Serialize,
    W: Write,
{
    let mut out = BufWriter::new(writer);
    let mut primary = Ok(());
    for record in records {
        let written = record.and_then(|record| {
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n")?;
            Ok(())
        });
        if written.is_err() {
            primary = written;
            break;
        }
    }
    let flushed = out.flush().map_err(ConvertError::from);
    ConvertError::join(primary, flushed)
}
