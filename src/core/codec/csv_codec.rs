//! CSV codec built on the `csv` crate

use super::{FileFormat, Table, TabularCodec, is_blank_row};
use crate::utils::error::{PipelineError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// UTF-8 CSV with a header line
#[derive(Debug, Clone, Copy)]
pub struct CsvCodec {
    delimiter: u8,
}

impl CsvCodec {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

impl TabularCodec for CsvCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn write_table(&self, headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        writer
            .write_record(headers)
            .map_err(|e| PipelineError::codec(format!("Failed to write CSV header: {}", e)))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| PipelineError::codec(format!("Failed to write CSV row: {}", e)))?;
        }

        writer
            .into_inner()
            .map_err(|e| PipelineError::codec(format!("Failed to flush CSV: {}", e)))
    }

    fn read_table(&self, bytes: &[u8]) -> Result<Table> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut table = Table::default();
        let mut seen_header = false;
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                PipelineError::codec(format!("Invalid CSV at record {}: {}", line + 1, e))
            })?;
            let row = cells(&record);
            if is_blank_row(&row) {
                continue;
            }
            if seen_header {
                table.rows.push(row);
            } else {
                table.headers = row.iter().map(|h| h.trim().to_string()).collect();
                seen_header = true;
            }
        }

        if !seen_header {
            return Err(PipelineError::codec("CSV file has no header row"));
        }
        Ok(table)
    }
}
