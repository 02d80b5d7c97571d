//! XLSX workbook export.
//!
//! A single worksheet named [`SHEET_NAME`] with a bold header row followed
//! by one row per record.

use crate::models::{ArticleRecord, ResultSet};
use rust_xlsxwriter::{Format, Workbook};
use std::error::Error;

pub const EXTENSION: &str = "xlsx";
pub const MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Berita";

/// Longest string a single XLSX cell may hold.
const MAX_CELL_CHARS: usize = 32_767;

fn cell_text(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Encode `results` as an XLSX workbook.
pub fn to_bytes(results: &ResultSet) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in ArticleRecord::COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (row, record) in results.iter().enumerate() {
        for (col, value) in record.values().iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, cell_text(value))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
