//! Scraping for the Antara News regional site.
//!
//! The work is split the same way for every page type:
//!
//! 1. **Indexing**: Fetch a search page and collect article URLs ([`antara`])
//! 2. **Extraction**: Fetch each article and pull out its fields ([`article`])
//!
//! # Selector Fallbacks
//!
//! | Field | Strategies, in priority order |
//! |-------|-------------------------------|
//! | Article containers | `article`, `div.simple-post` |
//! | Title | `h1.post-title`, `h1.article-title`, `h1` |
//! | Date | `span.article-date`, `span.date`, `time`, then `meta[property="article:published_time"]` |
//! | Body | `div.post-content`, `div.article-content`, `div[itemprop="articleBody"]` |
//!
//! Failed fetches are logged and skipped. Nothing here returns an error to
//! the caller.

pub mod antara;
pub mod article;
