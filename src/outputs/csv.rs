//! CSV export.
//!
//! UTF-8, comma separated, header row first. Fields containing commas,
//! quotes or newlines are quoted by the `csv` writer.

#![cfg_attr(feature = "xlsx", allow(dead_code))]

use crate::models::{ArticleRecord, ResultSet};
use std::error::Error;

pub const EXTENSION: &str = "csv";
pub const MIME: &str = "text/csv";

/// Encode `results` as CSV bytes.
///
/// The header row is always written, even for an empty result set.
pub fn to_bytes(results: &ResultSet) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(ArticleRecord::COLUMNS)?;
    for record in results {
        wtr.serialize(record)?;
    }
    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(data)
}
