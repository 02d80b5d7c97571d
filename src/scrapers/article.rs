//! Article detail page extraction.
//!
//! Each field is located by an ordered list of strategies. Strategies are
//! tried in priority order and the first one that locates an element wins,
//! even when that element's text turns out to be empty. The date field is
//! the one exception: empty element text falls through to the
//! `article:published_time` meta tag.
//!
//! # Year Filter
//!
//! An article is kept only if the year filter occurs as a literal substring
//! of the date text. There is no parsing, trimming or case folding, so a
//! filter of `"202"` keeps both 2023 and 2024 articles.

use crate::models::ArticleRecord;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::fmt;
use tracing::{debug, instrument};

/// Placeholder used when no title element exists.
pub const TITLE_NOT_FOUND: &str = "Judul tidak ditemukan";

/// Placeholder used when no body container exists.
pub const CONTENT_NOT_FOUND: &str = "Konten tidak ditemukan";

/// Elements whose text never counts as article body.
const STRIPPED_TAGS: [&str; 5] = ["script", "style", "div", "iframe", "ads"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static POST_TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.post-title"));
static ARTICLE_TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.article-title"));
static ANY_H1: Lazy<Selector> = Lazy::new(|| selector("h1"));

static ARTICLE_DATE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.article-date"));
static DATE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.date"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));
static PUBLISHED_META: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="article:published_time"]"#));

static POST_CONTENT: Lazy<Selector> = Lazy::new(|| selector("div.post-content"));
static ARTICLE_CONTENT: Lazy<Selector> = Lazy::new(|| selector("div.article-content"));
static ARTICLE_BODY: Lazy<Selector> = Lazy::new(|| selector(r#"div[itemprop="articleBody"]"#));

/// Fields of an [`ArticleRecord`] whose extraction can fail.
///
/// Title and body always resolve, falling back to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Date => "date",
        };
        f.write_str(name)
    }
}

/// Why an article page did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The date text does not contain the year filter.
    YearMismatch { date_text: String },
    /// A field could not be extracted; the whole record is dropped.
    FieldFailed { field: Field, reason: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::YearMismatch { date_text } => {
                write!(f, "date text {:?} does not contain the year filter", date_text)
            }
            Rejection::FieldFailed { field, reason } => {
                write!(f, "failed to extract {}: {}", field, reason)
            }
        }
    }
}

impl Error for Rejection {}

/// Stripped text of every text node under `el`, empties dropped, joined by
/// `separator`.
pub fn element_text(el: ElementRef<'_>, separator: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .join(separator)
}

/// Like [`element_text`], but skips text that sits inside any nested
/// element listed in [`STRIPPED_TAGS`].
pub fn visible_text(container: ElementRef<'_>, separator: &str) -> String {
    container
        .descendants()
        .filter(|node| {
            !node
                .ancestors()
                .take_while(|a| a.id() != container.id())
                .any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| STRIPPED_TAGS.contains(&e.name()))
                })
        })
        .filter_map(|node| node.value().as_text().map(|t| t.trim()))
        .filter(|s| !s.is_empty())
        .join(separator)
}

/// Title lookups, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    /// `<h1 class="post-title">`
    PostTitleHeading,
    /// `<h1 class="article-title">`
    ArticleTitleHeading,
    /// First `<h1>` of any class.
    AnyHeading,
}

impl TitleStrategy {
    pub const ORDER: [TitleStrategy; 3] = [
        TitleStrategy::PostTitleHeading,
        TitleStrategy::ArticleTitleHeading,
        TitleStrategy::AnyHeading,
    ];

    fn selector(self) -> &'static Selector {
        match self {
            TitleStrategy::PostTitleHeading => &*POST_TITLE,
            TitleStrategy::ArticleTitleHeading => &*ARTICLE_TITLE,
            TitleStrategy::AnyHeading => &*ANY_H1,
        }
    }

    /// Text of the first matching element, if one exists.
    pub fn apply(self, doc: &Html) -> Option<String> {
        doc.select(self.selector())
            .next()
            .map(|el| element_text(el, ""))
    }
}

/// Date lookups, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// `<span class="article-date">`
    ArticleDateSpan,
    /// `<span class="date">`
    DateSpan,
    /// First `<time>` element.
    TimeElement,
    /// `content` of `<meta property="article:published_time">`.
    PublishedTimeMeta,
}

impl DateStrategy {
    /// Element strategies; the first located element wins.
    pub const ELEMENT_CHAIN: [DateStrategy; 3] = [
        DateStrategy::ArticleDateSpan,
        DateStrategy::DateSpan,
        DateStrategy::TimeElement,
    ];

    /// `Ok(None)` when nothing matches. Fails only for a published-time
    /// meta tag that has no `content` attribute.
    pub fn apply(self, doc: &Html) -> Result<Option<String>, Rejection> {
        let sel: &Selector = match self {
            DateStrategy::ArticleDateSpan => &*ARTICLE_DATE_SPAN,
            DateStrategy::DateSpan => &*DATE_SPAN,
            DateStrategy::TimeElement => &*TIME,
            DateStrategy::PublishedTimeMeta => {
                return match doc.select(&PUBLISHED_META).next() {
                    None => Ok(None),
                    Some(meta) => match meta.value().attr("content") {
                        Some(content) => Ok(Some(content.to_string())),
                        None => Err(Rejection::FieldFailed {
                            field: Field::Date,
                            reason: "article:published_time meta has no content attribute"
                                .to_string(),
                        }),
                    },
                };
            }
        };
        Ok(doc.select(sel).next().map(|el| element_text(el, "")))
    }
}

/// Body container lookups, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStrategy {
    /// `<div class="post-content">`
    PostContent,
    /// `<div class="article-content">`
    ArticleContent,
    /// `<div itemprop="articleBody">`
    ItempropArticleBody,
}

impl BodyStrategy {
    pub const ORDER: [BodyStrategy; 3] = [
        BodyStrategy::PostContent,
        BodyStrategy::ArticleContent,
        BodyStrategy::ItempropArticleBody,
    ];

    fn selector(self) -> &'static Selector {
        match self {
            BodyStrategy::PostContent => &*POST_CONTENT,
            BodyStrategy::ArticleContent => &*ARTICLE_CONTENT,
            BodyStrategy::ItempropArticleBody => &*ARTICLE_BODY,
        }
    }

    /// Visible text of the first matching container, if one exists.
    pub fn apply(self, doc: &Html) -> Option<String> {
        doc.select(self.selector())
            .next()
            .map(|el| visible_text(el, " "))
    }
}

fn extract_title(doc: &Html) -> String {
    TitleStrategy::ORDER
        .iter()
        .find_map(|s| s.apply(doc))
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_string())
}

fn extract_date(doc: &Html) -> Result<String, Rejection> {
    let mut date_text = String::new();
    for strategy in DateStrategy::ELEMENT_CHAIN {
        if let Some(text) = strategy.apply(doc)? {
            date_text = text;
            break;
        }
    }
    if date_text.is_empty() {
        if let Some(content) = DateStrategy::PublishedTimeMeta.apply(doc)? {
            date_text = content;
        }
    }
    Ok(date_text)
}

fn extract_body(doc: &Html) -> String {
    BodyStrategy::ORDER
        .iter()
        .find_map(|s| s.apply(doc))
        .unwrap_or_else(|| CONTENT_NOT_FOUND.to_string())
}

/// Build an [`ArticleRecord`] from an article detail page.
///
/// Returns `Err` when the date text does not contain `year_filter`, or when
/// any field extraction fails. Records are never partially populated.
#[instrument(level = "debug", skip(doc))]
pub fn extract_article(
    doc: &Html,
    source_url: &str,
    year_filter: &str,
) -> Result<ArticleRecord, Rejection> {
    let title = extract_title(doc);
    let published_date_text = extract_date(doc)?;

    if !published_date_text.contains(year_filter) {
        return Err(Rejection::YearMismatch {
            date_text: published_date_text,
        });
    }

    let body = extract_body(doc);
    debug!(%title, date = %published_date_text, body_chars = body.chars().count(), "Extracted article");

    Ok(ArticleRecord {
        title,
        published_date_text,
        body,
        source_url: source_url.to_string(),
    })
}
