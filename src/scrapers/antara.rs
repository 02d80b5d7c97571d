//! Antara News search scraper.
//!
//! This module drives the site's paginated keyword search
//! (`{origin}/search?q=...&page=N`), follows every article link it finds and
//! keeps the articles whose date text contains the requested year.
//!
//! # Stop Conditions
//!
//! Pagination ends after `max_pages` pages, or earlier when a search page
//! cannot be fetched or contains no article containers. Whatever was
//! collected up to that point is returned. A single article that fails to
//! fetch or extract is skipped and the page carries on.

use crate::fetcher::PageFetcher;
use crate::models::{ArticleRecord, ResultSet, ScrapeRequest, SearchPageRequest};
use crate::progress::ProgressSink;
use crate::scrapers::article::extract_article;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Default site origin.
pub const BASE_URL: &str = "https://sumbar.antaranews.com";

/// Pause after each search page.
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

static ARTICLE_TAG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("static selector must parse"));
static SIMPLE_POST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.simple-post").expect("static selector must parse"));
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector must parse"));

/// Ways of locating article teasers on a search page, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStrategy {
    /// Every `<article>` element.
    ArticleTag,
    /// Every `<div class="simple-post">` (older page layout).
    SimplePostClass,
}

impl ContainerStrategy {
    pub const ORDER: [ContainerStrategy; 2] = [
        ContainerStrategy::ArticleTag,
        ContainerStrategy::SimplePostClass,
    ];

    pub fn apply(self, doc: &Html) -> Vec<ElementRef<'_>> {
        let sel: &Selector = match self {
            ContainerStrategy::ArticleTag => &*ARTICLE_TAG,
            ContainerStrategy::SimplePostClass => &*SIMPLE_POST,
        };
        doc.select(sel).collect()
    }
}

/// Containers from the first strategy that finds any.
pub fn article_containers(doc: &Html) -> Vec<ElementRef<'_>> {
    ContainerStrategy::ORDER
        .iter()
        .map(|s| s.apply(doc))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Extract article links from a search page.
///
/// Returns `None` when the page has no article containers at all. Otherwise
/// returns one absolute URL per container that holds an `<a href>`, resolved
/// against the origin of `base` (any path on `base` is ignored), in document
/// order.
pub fn index_article_links(doc: &Html, base: &Url) -> Option<Vec<Url>> {
    let containers = article_containers(doc);
    if containers.is_empty() {
        return None;
    }
    let origin = match base.join("/") {
        Ok(origin) => origin,
        Err(e) => {
            error!(%base, error = %e, "Base URL has no origin; no links resolved");
            return Some(Vec::new());
        }
    };

    let mut links = Vec::with_capacity(containers.len());
    for container in containers {
        let Some(href) = container
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            debug!("Article container without link; skipping");
            continue;
        };
        match origin.join(href) {
            Ok(resolved) => links.push(resolved),
            Err(e) => debug!(%href, error = %e, "Unresolvable article link; skipping"),
        }
    }
    Some(links)
}

/// Sequential search-and-extract pipeline over one [`PageFetcher`].
pub struct Scraper<F> {
    fetcher: F,
    base_url: Url,
    page_delay: Duration,
}

impl<F> Scraper<F>
where
    F: PageFetcher,
{
    pub fn new(fetcher: F, base_url: Url) -> Self {
        Self {
            fetcher,
            base_url,
            page_delay: PAGE_DELAY,
        }
    }

    /// Override the pause between search pages.
    #[cfg(test)]
    fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    #[cfg(test)]
    fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run the scrape for `request`, reporting progress to `progress`.
    ///
    /// Never fails: fetch and extraction failures are logged and turn into
    /// "stop paginating" or "skip this article".
    #[instrument(
        level = "info",
        skip_all,
        fields(keyword = %request.keyword, year = %request.year_filter, max_pages = request.max_pages)
    )]
    pub async fn run<P: ProgressSink>(&self, request: &ScrapeRequest, progress: &mut P) -> ResultSet {
        let mut results = ResultSet::new();

        for page in 1..=request.max_pages {
            progress.set_status(&format!("Mencari di halaman {}...", page));

            let search_url = match SearchPageRequest::new(&request.keyword, page).url(&self.base_url) {
                Ok(url) => url,
                Err(e) => {
                    error!(page, error = %e, "Could not build search URL; stopping");
                    break;
                }
            };

            let Some(links) = self.index_page(&search_url).await else {
                break;
            };
            info!(page, count = links.len(), "Indexed article links");

            let before = results.len();
            for record in self.fetch_articles(links, &request.year_filter).await {
                results.push(record);
            }
            info!(page, accepted = results.len() - before, total = results.len(), "Page complete");

            progress.set_progress(page as f64 / request.max_pages as f64);
            sleep(self.page_delay).await;
        }

        progress.set_status("Proses Selesai!");
        info!(count = results.len(), "Scrape finished");
        results
    }

    /// Fetch one search page and pull its article links. `None` means stop.
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn index_page(&self, url: &Url) -> Option<Vec<Url>> {
        let doc = match self.fetcher.fetch(url.as_str()).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "Search page fetch failed; stopping");
                return None;
            }
        };

        let links = index_article_links(&doc, &self.base_url);
        if links.is_none() {
            info!("No article containers on search page; stopping");
        }
        links
    }

    /// Fetch and extract each link in order, dropping failures.
    async fn fetch_articles(&self, links: Vec<Url>, year_filter: &str) -> Vec<ArticleRecord> {
        stream::iter(links)
            .then(|url: Url| async move { self.fetch_article(&url, year_filter).await })
            .filter_map(std::future::ready)
            .collect()
            .await
    }

    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn fetch_article(&self, url: &Url, year_filter: &str) -> Option<ArticleRecord> {
        let doc = match self.fetcher.fetch(url.as_str()).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "Article fetch failed; skipping");
                return None;
            }
        };

        match extract_article(&doc, url.as_str(), year_filter) {
            Ok(record) => Some(record),
            Err(rejection) => {
                debug!(reason = %rejection, "Article rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::error::Error;

    /// Serves canned pages by URL and records every request.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.borrow().clone()
        }
    }

    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Html, Box<dyn Error>> {
            self.requested.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(Html::parse_document(body)),
                None => Err(format!("404 Not Found: {}", url).into()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        fractions: Vec<f64>,
        statuses: Vec<String>,
    }

    impl ProgressSink for RecordingProgress {
        fn set_progress(&mut self, fraction: f64) {
            self.fractions.push(fraction);
        }

        fn set_status(&mut self, text: &str) {
            self.statuses.push(text.to_string());
        }
    }

    fn base() -> Url {
        Url::parse(BASE_URL).unwrap()
    }

    fn search(keyword: &str, page: u32) -> String {
        SearchPageRequest::new(keyword, page)
            .url(&base())
            .unwrap()
            .to_string()
    }

    fn listing(hrefs: &[&str]) -> String {
        let items: String = hrefs
            .iter()
            .map(|h| format!(r#"<article><a href="{}">teaser</a></article>"#, h))
            .collect();
        format!("<html><body>{}</body></html>", items)
    }

    fn detail(title: &str, date: &str) -> String {
        format!(
            r#"<html><body><h1 class="post-title">{}</h1><span class="article-date">{}</span>
               <div class="post-content"><p>Isi {}</p></div></body></html>"#,
            title, date, title
        )
    }

    fn article(path: &str) -> String {
        format!("{}{}", BASE_URL, path)
    }

    fn request(keyword: &str, year: &str, max_pages: u32) -> ScrapeRequest {
        ScrapeRequest {
            keyword: keyword.to_string(),
            year_filter: year.to_string(),
            max_pages,
        }
    }

    fn scraper(fetcher: StubFetcher) -> Scraper<StubFetcher> {
        Scraper::new(fetcher, base()).with_page_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_stops_at_page_without_containers() {
        let fetcher = StubFetcher::default()
            .page(&search("solok", 1), &listing(&["/berita/1", "/berita/2"]))
            .page(&search("solok", 2), "<html><body><p>Tidak ada hasil</p></body></html>")
            .page(&search("solok", 3), &listing(&["/berita/3"]))
            .page(&article("/berita/1"), &detail("Satu", "1 Mei 2024"))
            .page(&article("/berita/2"), &detail("Dua", "2 Mei 2024"))
            .page(&article("/berita/3"), &detail("Tiga", "3 Mei 2024"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper.run(&request("solok", "2024", 5), &mut progress).await;

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Satu", "Dua"]);
        let requested = scraper.fetcher().requested();
        assert!(requested.contains(&search("solok", 2)));
        assert!(!requested.contains(&search("solok", 3)));
        assert_eq!(progress.fractions, vec![0.2]);
    }

    #[tokio::test]
    async fn test_failed_article_is_skipped_and_page_continues() {
        let fetcher = StubFetcher::default()
            .page(
                &search("padang", 1),
                &listing(&["/berita/a", "/berita/hilang", "/berita/c"]),
            )
            .page(&article("/berita/a"), &detail("A", "2024"))
            .page(&article("/berita/c"), &detail("C", "2024"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper.run(&request("padang", "2024", 3), &mut progress).await;

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(results.records()[1].source_url, article("/berita/c"));
        // Page 2 search fetch fails, so nothing after it is requested.
        let requested = scraper.fetcher().requested();
        assert_eq!(requested.last(), Some(&search("padang", 2)));
        assert!(!requested.contains(&search("padang", 3)));
    }

    #[tokio::test]
    async fn test_respects_max_pages() {
        let fetcher = StubFetcher::default()
            .page(&search("bukittinggi", 1), &listing(&["/berita/1"]))
            .page(&search("bukittinggi", 2), &listing(&["/berita/2"]))
            .page(&article("/berita/1"), &detail("Satu", "2023"))
            .page(&article("/berita/2"), &detail("Dua", "2023"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper
            .run(&request("bukittinggi", "2023", 1), &mut progress)
            .await;

        assert_eq!(results.len(), 1);
        assert!(!scraper.fetcher().requested().contains(&search("bukittinggi", 2)));
        assert_eq!(progress.fractions, vec![1.0]);
        assert_eq!(
            progress.statuses,
            vec!["Mencari di halaman 1...".to_string(), "Proses Selesai!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_matching_year_yields_empty_result() {
        let fetcher = StubFetcher::default()
            .page(&search("solok", 1), &listing(&["/berita/1"]))
            .page(&article("/berita/1"), &detail("Satu", "12 Maret 2024"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper.run(&request("solok", "1999", 1), &mut progress).await;

        assert!(results.is_empty());
        assert_eq!(progress.statuses.last().map(String::as_str), Some("Proses Selesai!"));
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_kept_in_order() {
        let fetcher = StubFetcher::default()
            .page(&search("sumbar", 1), &listing(&["/berita/x", "/berita/y"]))
            .page(&search("sumbar", 2), &listing(&["/berita/x"]))
            .page(&article("/berita/x"), &detail("X", "2024"))
            .page(&article("/berita/y"), &detail("Y", "2024"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper.run(&request("sumbar", "2024", 2), &mut progress).await;

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["X", "Y", "X"]);
        assert_eq!(progress.fractions, vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_page_with_containers_but_no_links_continues() {
        let fetcher = StubFetcher::default()
            .page(&search("solok", 1), "<html><body><article><p>no link</p></article></body></html>")
            .page(&search("solok", 2), &listing(&["/berita/2"]))
            .page(&article("/berita/2"), &detail("Dua", "2024"));
        let scraper = scraper(fetcher);
        let mut progress = RecordingProgress::default();

        let results = scraper.run(&request("solok", "2024", 2), &mut progress).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results.records()[0].title, "Dua");
    }

    #[test]
    fn test_simple_post_fallback_and_link_resolution() {
        let doc = Html::parse_document(
            r#"<html><body>
                 <div class="simple-post"><a href="/berita/1/relatif">a</a></div>
                 <div class="simple-post"><span>tanpa tautan</span></div>
                 <div class="simple-post"><a name="x">x</a><a href="https://other.example/b">b</a></div>
               </body></html>"#,
        );
        assert!(ContainerStrategy::ArticleTag.apply(&doc).is_empty());
        assert_eq!(ContainerStrategy::SimplePostClass.apply(&doc).len(), 3);

        let links = index_article_links(&doc, &base()).unwrap();
        let links: Vec<String> = links.into_iter().map(String::from).collect();
        assert_eq!(
            links,
            vec![
                "https://sumbar.antaranews.com/berita/1/relatif".to_string(),
                "https://other.example/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_article_tag_strategy_takes_priority() {
        let doc = Html::parse_document(
            r#"<html><body>
                 <div class="simple-post"><a href="/lama">lama</a></div>
                 <article><a href="/baru">baru</a></article>
               </body></html>"#,
        );
        let links = index_article_links(&doc, &base()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path(), "/baru");
    }

    #[test]
    fn test_links_resolve_against_origin_not_base_path() {
        let doc = Html::parse_document(
            r#"<html><body>
                 <article><a href="berita/1">relatif</a></article>
                 <article><a href="/berita/2">akar</a></article>
               </body></html>"#,
        );
        let mirror = Url::parse("https://sumbar.antaranews.com/mirror/").unwrap();
        let links: Vec<String> = index_article_links(&doc, &mirror)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://sumbar.antaranews.com/berita/1".to_string(),
                "https://sumbar.antaranews.com/berita/2".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_containers_is_none() {
        let doc = Html::parse_document("<html><body><p>kosong</p></body></html>");
        assert!(index_article_links(&doc, &base()).is_none());
    }
}
