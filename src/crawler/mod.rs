//! Crawler module for the listing walk and article extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with charset handling
//! - Listing page link discovery
//! - Article extraction and OCR enrichment
//! - Overall crawl coordination and interruption

mod article;
mod coordinator;
mod fetcher;
mod interrupt;
mod listing;

#[cfg(test)]
mod testing;

pub use article::{parse_article, ArticleExtractor, ArticlePage, ExtractError, LinkedFile};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{
    build_http_client, decode_body, FetchFailure, FetchMode, FetchResult, HttpFetcher,
    PageFetcher,
};
pub use interrupt::{InterruptAction, InterruptSignal};
pub use listing::extract_article_links;
