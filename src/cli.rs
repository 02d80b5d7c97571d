//! Command-line interface definitions for Berita Scraper.
//!
//! This module defines the CLI arguments using the `clap` crate, plus the
//! check that runs before any request is made.

use clap::Parser;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::scrapers::antara::BASE_URL;

/// Command-line arguments for Berita Scraper.
///
/// # Examples
///
/// ```sh
/// # Five pages of results for "Kota Solok" published in 2025
/// berita_scraper -k "Kota Solok" -y 2025
///
/// # Twenty pages, saved under ./hasil
/// berita_scraper -k padang -y 2024 -p 20 -o ./hasil
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keyword
    #[arg(short, long)]
    pub keyword: String,

    /// Text the article date must contain, usually a year such as 2025
    #[arg(short, long = "year")]
    pub year_filter: String,

    /// Number of search result pages to walk
    #[arg(short = 'p', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub max_pages: u32,

    /// Directory the export file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Site origin to search
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,
}

/// Input that must be fixed before a scrape can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    MissingKeyword,
    MissingYear,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::MissingKeyword => f.write_str("keyword must not be empty"),
            InputError::MissingYear => f.write_str("year must not be empty"),
        }
    }
}

impl Error for InputError {}

impl Cli {
    /// Reject empty keyword or year. Whitespace counts as input.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.keyword.is_empty() {
            return Err(InputError::MissingKeyword);
        }
        if self.year_filter.is_empty() {
            return Err(InputError::MissingYear);
        }
        Ok(())
    }
}
