//! Progress reporting for a scrape run.
//!
//! The scraper reports a completion fraction and a status line through
//! [`ProgressSink`], passed explicitly into [`Scraper::run`](crate::scrapers::antara::Scraper::run).

use tracing::info;

/// Receiver for progress updates.
pub trait ProgressSink {
    /// Completion in `0.0..=1.0`.
    fn set_progress(&mut self, fraction: f64);

    /// Human-readable status text.
    fn set_status(&mut self, text: &str);
}

/// Reports progress through `tracing`.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_fraction: f64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn last_fraction(&self) -> f64 {
        self.last_fraction
    }
}

impl ProgressSink for LogProgress {
    fn set_progress(&mut self, fraction: f64) {
        self.last_fraction = fraction.clamp(0.0, 1.0);
        info!(percent = %format!("{:.0}%", self.last_fraction * 100.0), "Progress");
    }

    fn set_status(&mut self, text: &str) {
        info!(status = %text, "Status");
    }
}
