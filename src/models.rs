//! Data models for search requests and scraped articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SearchPageRequest`]: One page of the site's keyword search
//! - [`ScrapeRequest`]: The user's keyword, year filter and page limit for one run
//! - [`ArticleRecord`]: The fields extracted from one accepted article
//! - [`ResultSet`]: Ordered collection of accepted articles for one run

use serde::Serialize;
use url::Url;

/// A single page of the search listing.
///
/// Built fresh for each iteration of the scrape loop and discarded once its
/// URL has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPageRequest {
    /// The raw keyword as typed by the user.
    pub keyword: String,
    /// 1-based page number.
    pub page_number: u32,
}

impl SearchPageRequest {
    pub fn new(keyword: &str, page_number: u32) -> Self {
        Self {
            keyword: keyword.to_string(),
            page_number,
        }
    }

    /// Build `{origin}/search?q={keyword}&page={n}` with the keyword
    /// form-urlencoded (spaces become `+`).
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.join("/search")?;
        url.query_pairs_mut()
            .clear()
            .append_pair("q", &self.keyword)
            .append_pair("page", &self.page_number.to_string());
        Ok(url)
    }
}

/// Parameters for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub keyword: String,
    /// Literal substring the article's date text must contain.
    pub year_filter: String,
    pub max_pages: u32,
}

/// An accepted article.
///
/// Every field is free text. `published_date_text` is whatever was found in
/// the date location and is never parsed. The serde renames are the column
/// headers of the exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    #[serde(rename = "Judul Berita")]
    pub title: String,
    #[serde(rename = "Tanggal")]
    pub published_date_text: String,
    #[serde(rename = "Isi Berita")]
    pub body: String,
    #[serde(rename = "Link Sumber")]
    pub source_url: String,
}

impl ArticleRecord {
    /// Column headers in export order.
    pub const COLUMNS: [&'static str; 4] = ["Judul Berita", "Tanggal", "Isi Berita", "Link Sumber"];

    /// Field values in the same order as [`ArticleRecord::COLUMNS`].
    pub fn values(&self) -> [&str; 4] {
        [
            &self.title,
            &self.published_date_text,
            &self.body,
            &self.source_url,
        ]
    }
}

/// The ordered, append-only collection of records produced by one run.
///
/// Order is discovery order: page order, then document order within a page.
/// The same article found on two pages appears twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ArticleRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ArticleRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
