//! XLSX codec: `rust_xlsxwriter` writes, `calamine` reads

use super::{FileFormat, Table, TabularCodec, is_blank_row};
use crate::utils::error::{PipelineError, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;

const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

/// Single-sheet XLSX workbook with a bold header row
#[derive(Debug, Clone, Default)]
pub struct XlsxCodec {
    sheet_name: Option<String>,
}

impl XlsxCodec {
    pub fn new() -> Self {
        Self { sheet_name: None }
    }

    /// Name the written worksheet (reading always uses the first sheet)
    pub fn with_sheet_name(name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(name.into()),
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        other => other.to_string(),
    }
}

impl TabularCodec for XlsxCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Xlsx
    }

    fn write_table(&self, headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
        if headers.len() > MAX_COLUMNS {
            return Err(PipelineError::codec(format!(
                "{} columns exceed the worksheet limit",
                headers.len()
            )));
        }
        if rows.len() + 1 > MAX_ROWS {
            return Err(PipelineError::codec(format!(
                "{} rows exceed the worksheet limit",
                rows.len()
            )));
        }

        let xlsx_err = |e: rust_xlsxwriter::XlsxError| {
            PipelineError::codec(format!("Failed to write XLSX: {}", e))
        };

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        if let Some(name) = &self.sheet_name {
            sheet.set_name(name).map_err(xlsx_err)?;
        }

        for (col, header) in headers.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(xlsx_err)?;
        }
        for (idx, row) in rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, value) in row.iter().take(MAX_COLUMNS).enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet
                    .write_string(row_num, col as u16, value)
                    .map_err(xlsx_err)?;
            }
        }

        workbook.save_to_buffer().map_err(xlsx_err)
    }

    fn read_table(&self, bytes: &[u8]) -> Result<Table> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| PipelineError::codec(format!("Failed to open XLSX: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| PipelineError::codec("XLSX workbook has no worksheet"))?
            .map_err(|e| PipelineError::codec(format!("Failed to read worksheet: {}", e)))?;

        // Leading empty columns are not part of the used range
        let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let mut table = Table::default();
        let mut seen_header = false;
        for row in range.rows() {
            let mut cells = vec![String::new(); col_offset];
            cells.extend(row.iter().map(cell_text));
            if is_blank_row(&cells) {
                continue;
            }
            if seen_header {
                table.rows.push(cells);
            } else {
                table.headers = cells.iter().map(|h| h.trim().to_string()).collect();
                seen_header = true;
            }
        }

        if !seen_header {
            return Err(PipelineError::codec("XLSX worksheet has no header row"));
        }
        Ok(table)
    }
}
