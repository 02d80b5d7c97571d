//! Page fetching over HTTP.
//!
//! The scraper never talks to `reqwest` directly; it goes through the
//! [`PageFetcher`] trait so the orchestration can be driven by canned pages
//! in tests.
//!
//! # Failure Model
//!
//! Every failure (transport error, timeout, non-success status, undecodable
//! body) comes back as the same `Err`. Callers log it and treat it as
//! "could not fetch"; none of them inspect the error kind.

use reqwest::Client;
use scraper::Html;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Browser identification sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can turn a URL into a parsed HTML document.
pub trait PageFetcher {
    /// Fetch `url` and parse the response body as an HTML document.
    async fn fetch(&self, url: &str) -> Result<Html, Box<dyn Error>>;
}

/// [`PageFetcher`] backed by a `reqwest` client.
///
/// One GET per call, no retries, no caching. Redirects follow the client
/// default policy.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the fixed User-Agent and timeout.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("user_agent", &USER_AGENT)
            .field("timeout", &REQUEST_TIMEOUT)
            .finish()
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<Html, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = async {
            let body = self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            Ok::<_, reqwest::Error>(body)
        }
        .await;
        let dt = t0.elapsed();

        match res {
            Ok(body) => {
                debug!(
                    bytes = body.len(),
                    elapsed_ms = dt.as_millis() as u64,
                    "Fetched page"
                );
                Ok(Html::parse_document(&body))
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "GET failed");
                Err(Box::new(e))
            }
        }
    }
}
