//! Export of a [`ResultSet`] as a downloadable file.
//!
//! The tabular format is picked at build time:
//!
//! | Build | Module | Extension | MIME |
//! |-------|--------|-----------|------|
//! | default | [`csv`] | `csv` | `text/csv` |
//! | `--features xlsx` | [`xlsx`] | `xlsx` | `application/vnd.openxmlformats-officedocument.spreadsheetml.sheet` |
//!
//! Both write the columns `Judul Berita`, `Tanggal`, `Isi Berita`,
//! `Link Sumber` in that order, one row per record.

pub mod csv;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use crate::models::ResultSet;
use std::error::Error;
use tracing::{info, instrument, warn};

/// An encoded export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Encoded file contents.
    pub data: Vec<u8>,
    /// Suggested file name, `berita_{keyword}_{year}.{ext}`.
    pub file_name: String,
    pub mime: &'static str,
}

/// Suggested download name for a run.
pub fn file_name(keyword: &str, year_filter: &str, extension: &str) -> String {
    format!("berita_{}_{}.{}", keyword, year_filter, extension)
}

/// Encode `results` in this build's format.
#[instrument(level = "info", skip(results), fields(records = results.len()))]
pub fn download(
    results: &ResultSet,
    keyword: &str,
    year_filter: &str,
) -> Result<Download, Box<dyn Error>> {
    #[cfg(not(feature = "xlsx"))]
    let (data, extension, mime) = (csv::to_bytes(results)?, csv::EXTENSION, csv::MIME);
    #[cfg(feature = "xlsx")]
    let (data, extension, mime) = (xlsx::to_bytes(results)?, xlsx::EXTENSION, xlsx::MIME);

    let download = Download {
        data,
        file_name: file_name(keyword, year_filter, extension),
        mime,
    };
    info!(file_name = %download.file_name, bytes = download.data.len(), mime, "Encoded export");
    Ok(download)
}

/// Post-run step: encode the results, or warn and return `None` when the run
/// collected nothing. An empty run is not an error and writes no file.
#[instrument(level = "info", skip(results), fields(records = results.len()))]
pub fn finish(
    results: &ResultSet,
    keyword: &str,
    year_filter: &str,
) -> Result<Option<Download>, Box<dyn Error>> {
    if results.is_empty() {
        warn!("Tidak ada berita yang cocok ditemukan.");
        return Ok(None);
    }

    info!(count = results.len(), "Berhasil mengambil {} artikel!", results.len());
    download(results, keyword, year_filter).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            published_date_text: "12 Maret 2024".to_string(),
            body: "Isi".to_string(),
            source_url: "https://sumbar.antaranews.com/berita/1".to_string(),
        }
    }

    #[test]
    fn test_finish_empty_result_produces_no_download() {
        let finished = finish(&ResultSet::new(), "solok", "1999").unwrap();
        assert!(finished.is_none());
    }

    #[test]
    fn test_finish_with_records_produces_download() {
        let mut results = ResultSet::new();
        results.push(record("Satu"));
        results.push(record("Dua"));

        let download = finish(&results, "Kota Solok", "2024").unwrap().unwrap();
        assert!(download.file_name.starts_with("berita_Kota Solok_2024."));
        assert!(!download.data.is_empty());

        #[cfg(not(feature = "xlsx"))]
        {
            let text = String::from_utf8(download.data).unwrap();
            assert_eq!(text.lines().count(), 3);
            assert!(text.contains("Satu") && text.contains("Dua"));
        }
    }

    #[test]
    fn test_file_name_template() {
        assert_eq!(file_name("Kota Solok", "2025", "csv"), "berita_Kota Solok_2025.csv");
    }

    #[test]
    fn test_download_uses_build_format() {
        let mut results = ResultSet::new();
        results.push(ArticleRecord {
            title: "Judul".to_string(),
            published_date_text: "2025".to_string(),
            body: "Isi".to_string(),
            source_url: "https://sumbar.antaranews.com/berita/1".to_string(),
        });

        let download = download(&results, "solok", "2025").unwrap();
        assert!(!download.data.is_empty());

        #[cfg(not(feature = "xlsx"))]
        {
            assert_eq!(download.file_name, "berita_solok_2025.csv");
            assert_eq!(download.mime, "text/csv");
        }
        #[cfg(feature = "xlsx")]
        {
            assert_eq!(download.file_name, "berita_solok_2025.xlsx");
            assert!(download.data.starts_with(b"PK"));
        }
    }
}
