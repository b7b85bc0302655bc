//! Mutable state owned by the crawl coordinator

use crate::models::ArticleRecord;
use std::collections::HashSet;

/// Counters collected while crawling, reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Listing pages fetched successfully
    pub listing_pages_fetched: u32,

    /// Article URLs handed to the extractor
    pub articles_attempted: u32,

    /// Articles whose page could not be fetched
    pub articles_unavailable: u32,

    /// Articles whose extraction returned an error
    pub articles_errored: u32,

    /// Article links skipped because they were already visited
    pub duplicate_links: u32,
}

/// Crawl state tracked across listing pages
///
/// Only the coordinator mutates this. Results are append-only: a record is
/// never changed once pushed.
#[derive(Debug, Clone)]
pub struct CrawlState {
    visited_article_urls: HashSet<String>,
    results: Vec<ArticleRecord>,
    page_cursor: u32,
    counters: CrawlCounters,
}

impl CrawlState {
    /// Creates an empty state positioned at the first listing page
    pub fn new() -> Self {
        Self {
            visited_article_urls: HashSet::new(),
            results: Vec::new(),
            page_cursor: 1,
            counters: CrawlCounters::default(),
        }
    }

    /// Marks an article URL as visited
    ///
    /// Returns true if the URL was not seen before and should be processed.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited_article_urls.contains(url) {
            self.counters.duplicate_links += 1;
            return false;
        }
        self.visited_article_urls.insert(url.to_string());
        true
    }

    /// Returns true if the URL was already queued or processed
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited_article_urls.contains(url)
    }

    /// Appends a finished article record
    pub fn push_result(&mut self, record: ArticleRecord) {
        self.results.push(record);
    }

    /// Returns true once at least `cap` records were collected
    pub fn is_at_cap(&self, cap: usize) -> bool {
        self.results.len() >= cap
    }

    pub fn results(&self) -> &[ArticleRecord] {
        &self.results
    }

    /// Consumes the state, returning the collected records in crawl order
    pub fn into_results(self) -> Vec<ArticleRecord> {
        self.results
    }

    pub fn page_cursor(&self) -> u32 {
        self.page_cursor
    }

    pub fn set_page_cursor(&mut self, page: u32) {
        self.page_cursor = page;
    }

    pub fn visited_count(&self) -> usize {
        self.visited_article_urls.len()
    }

    pub fn counters(&self) -> CrawlCounters {
        self.counters
    }

    pub fn counters_mut(&mut self) -> &mut CrawlCounters {
        &mut self.counters
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
