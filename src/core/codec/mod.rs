//! Tabular codecs
//!
//! A codec turns a byte stream into rows of string cells and back. Typed
//! records cross that boundary through a [`RecordBinding`], which maps column
//! positions to fields in declaration order.

mod binding;
mod csv_codec;
mod format;
mod xlsx_codec;

pub use binding::{FieldBinding, FieldReader, FieldWriter, RecordBinding, TabularRecord, parse_cell};
pub use csv_codec::CsvCodec;
pub use format::FileFormat;
pub use xlsx_codec::XlsxCodec;

use crate::utils::error::{PipelineError, Result};
use std::sync::Arc;
use tracing::debug;

/// A decoded file: the header row and the data rows below it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Byte-level reader/writer for one tabular format
pub trait TabularCodec: Send + Sync {
    /// Format this codec reads and writes
    fn format(&self) -> FileFormat;

    /// Serialize a header row followed by data rows
    fn write_table(&self, headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>>;

    /// Parse bytes into a header row and data rows; blank rows are dropped
    fn read_table(&self, bytes: &[u8]) -> Result<Table>;
}

/// Codec for a file format
pub fn codec_for(format: FileFormat) -> Arc<dyn TabularCodec> {
    match format {
        FileFormat::Csv => Arc::new(CsvCodec::new()),
        FileFormat::Xlsx => Arc::new(XlsxCodec::new()),
    }
}

/// Encode records under the given headers
///
/// Header `i` labels field `i` of the binding. A record whose cells all
/// render blank is rejected, since readers drop blank rows.
pub fn encode_records<R>(
    codec: &dyn TabularCodec,
    binding: &RecordBinding<R>,
    headers: &[String],
    records: &[R],
) -> Result<Vec<u8>> {
    check_headers(binding, headers)?;
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let cells = binding.to_cells(record);
            if is_blank_row(&cells) {
                return Err(PipelineError::codec(format!(
                    "record {} has no non-blank cell",
                    idx + 1
                )));
            }
            Ok(cells)
        })
        .collect::<Result<Vec<_>>>()?;
    codec.write_table(headers, &rows)
}

/// Decode records from bytes, mapping columns to fields by position
pub fn decode_records<R: Default>(
    codec: &dyn TabularCodec,
    binding: &RecordBinding<R>,
    headers: &[String],
    bytes: &[u8],
) -> Result<Vec<R>> {
    check_headers(binding, headers)?;
    let table = codec.read_table(bytes)?;

    if table.headers != headers {
        debug!(
            expected = ?headers,
            found = ?table.headers,
            "File headers differ from declared headers, mapping by position"
        );
    }

    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, cells)| binding.from_cells(cells, idx + 1))
        .collect()
}

fn check_headers<R>(binding: &RecordBinding<R>, headers: &[String]) -> Result<()> {
    if headers.len() != binding.len() {
        return Err(PipelineError::codec(format!(
            "{} headers declared for {} bound fields",
            headers.len(),
            binding.len()
        )));
    }
    Ok(())
}

pub(crate) fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}
