//! # Berita Scraper
//!
//! Collects news articles from the Antara News regional site (Sumatera Barat)
//! by keyword and publication year, and saves them as a CSV file (or an XLSX
//! workbook when built with `--features xlsx`).
//!
//! ## Usage
//!
//! ```sh
//! berita_scraper -k "Kota Solok" -y 2025 -p 5 -o ./hasil
//! ```
//!
//! ## Architecture
//!
//! The application is a short sequential pipeline:
//! 1. **Searching**: Walk the site's search pages for the keyword
//! 2. **Fetching**: Download every article linked from those pages
//! 3. **Filtering**: Keep articles whose date text contains the year
//! 4. **Output**: Encode the kept articles and write the file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod fetcher;
mod models;
mod outputs;
mod progress;
mod scrapers;
mod utils;

use cli::Cli;
use fetcher::HttpFetcher;
use models::{ResultSet, ScrapeRequest};
use progress::LogProgress;
use scrapers::antara::Scraper;
use utils::{ensure_writable_dir, sanitize_file_name, truncate_for_log};

/// Number of records shown in the post-run preview.
const PREVIEW_ROWS: usize = 5;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("berita_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = args.validate() {
        warn!(error = %e, "Masukkan kata kunci dan tahun terlebih dahulu");
        return Ok(());
    }

    let base_url = Url::parse(&args.base_url).inspect_err(|e| {
        error!(base_url = %args.base_url, error = %e, "Invalid base URL");
    })?;

    // Fail before any network traffic if the file can't be saved.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Scrape ----
    let request = ScrapeRequest {
        keyword: args.keyword.clone(),
        year_filter: args.year_filter.clone(),
        max_pages: args.max_pages,
    };
    let scraper = Scraper::new(HttpFetcher::new()?, base_url);
    let mut progress = LogProgress::new();
    let results = scraper.run(&request, &mut progress).await;

    // ---- Export ----
    let finished = outputs::finish(&results, &request.keyword, &request.year_filter)
        .inspect_err(|e| error!(error = %e, "Failed to encode export"))?;
    let Some(download) = finished else {
        info!(elapsed = ?start_time.elapsed(), "Execution complete");
        return Ok(());
    };
    log_preview(&results);

    let path = args.output_dir.join(sanitize_file_name(&download.file_name));

    info!(path = %path.display(), mime = download.mime, "Writing export");
    if let Err(e) = tokio::fs::write(&path, &download.data).await {
        error!(path = %path.display(), error = %e, "Failed writing export");
        return Err(e.into());
    }
    info!(path = %path.display(), bytes = download.data.len(), "Wrote export");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Log the first few records, the way a table preview would show them.
fn log_preview(results: &ResultSet) {
    for (i, record) in results.iter().take(PREVIEW_ROWS).enumerate() {
        info!(
            row = i,
            title = %record.title,
            date = %record.published_date_text,
            body = %truncate_for_log(&record.body, 80),
            link = %record.source_url,
            "Preview"
        );
    }
}
