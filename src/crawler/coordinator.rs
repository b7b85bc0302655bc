//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl state machine that coordinates:
//! - Paginating the listing and discovering article links
//! - De-duplicating article URLs across listing pages
//! - Extracting articles one at a time
//! - Enforcing the article cap and the courtesy delays
//! - Honoring interruption at state boundaries
//!
//! # State Machine
//!
//! ```text
//! FetchingListing(n) ──► DiscoveringLinks ──► ProcessingArticle ──┐
//!        ▲                                        │  (per link)   │
//!        └──────────────── page n + 1 ◄───────────┴───────────────┘
//! ```
//!
//! Terminal phases are `Completed(reason)` and `Interrupted`. In both cases
//! the records collected so far are returned in the [`CrawlReport`].

use crate::config::Config;
use crate::crawler::article::ArticleExtractor;
use crate::crawler::fetcher::{FetchMode, HttpFetcher, PageFetcher};
use crate::crawler::interrupt::InterruptSignal;
use crate::crawler::listing::extract_article_links;
use crate::links::resolve_link;
use crate::models::ArticleRecord;
use crate::ocr::{OcrClient, OcrService};
use crate::output::save_results;
use crate::state::{CompletionReason, CrawlCounters, CrawlPhase, CrawlState};
use crate::{ConfigError, CrawlerError};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Terminal phase the crawl ended in
    pub outcome: CrawlPhase,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Last listing page the crawl worked on
    pub last_page: u32,
    pub counters: CrawlCounters,
    /// Collected records in crawl order
    pub records: Vec<ArticleRecord>,
    /// Where the records were saved, if they were
    pub saved_to: Option<PathBuf>,
}

impl CrawlReport {
    pub fn was_interrupted(&self) -> bool {
        matches!(self.outcome, CrawlPhase::Interrupted)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main crawler coordinator structure
///
/// Owns the [`CrawlState`]; no other component mutates it.
pub struct Coordinator {
    config: Arc<Config>,
    base_url: Url,
    listing_url: Url,
    fetcher: Arc<dyn PageFetcher>,
    extractor: ArticleExtractor,
    interrupt: InterruptSignal,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a coordinator from explicit fetcher and OCR implementations
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - The site URLs in the configuration are unusable
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        ocr: Arc<dyn OcrService>,
        interrupt: InterruptSignal,
    ) -> Result<Self, CrawlerError> {
        let base_url = Url::parse(&config.site.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.site.base_url, e))
        })?;
        let listing_url = base_url.join(&config.site.listing_path).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid listing-path '{}': {}",
                config.site.listing_path, e
            ))
        })?;

        let extractor = ArticleExtractor::new(Arc::clone(&fetcher), ocr);

        Ok(Self {
            config: Arc::new(config),
            base_url,
            listing_url,
            fetcher,
            extractor,
            interrupt,
            state: CrawlState::new(),
        })
    }

    /// Creates a coordinator talking to the real site and OCR service
    pub fn with_http(config: Config, interrupt: InterruptSignal) -> Result<Self, CrawlerError> {
        let fetcher = Arc::new(HttpFetcher::new(&config.user_agent, &config.crawler)?);
        let ocr = Arc::new(OcrClient::new(&config.ocr)?);
        Self::new(config, fetcher, ocr, interrupt)
    }

    /// URL of the listing page with the given 1-based number
    pub fn listing_page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.listing_url.to_string()
        } else {
            format!("{}?page={}", self.listing_url, page)
        }
    }

    /// Runs the state machine until it reaches a terminal phase
    ///
    /// Never fails: fetch, extraction and OCR failures are absorbed along the
    /// way, and whatever was collected is returned.
    pub async fn run(mut self) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!("Starting crawl at {}", self.listing_page_url(1));

        let mut phase = CrawlPhase::FetchingListing { page: 1 };
        while !phase.is_terminal() {
            if self.interrupt.is_triggered() {
                tracing::warn!(
                    "Crawl interrupted during {}, keeping {} articles",
                    phase.name(),
                    self.state.results().len()
                );
                phase = CrawlPhase::Interrupted;
                break;
            }
            phase = self.step(phase).await;
        }

        let finished_at = Utc::now();
        tracing::info!(
            "Crawl finished ({}): {} articles from {} listing pages in {}s",
            phase,
            self.state.results().len(),
            self.state.counters().listing_pages_fetched,
            (finished_at - started_at).num_seconds()
        );

        CrawlReport {
            outcome: phase,
            started_at,
            finished_at,
            last_page: self.state.page_cursor(),
            counters: self.state.counters(),
            records: self.state.into_results(),
            saved_to: None,
        }
    }

    /// Performs one transition
    async fn step(&mut self, phase: CrawlPhase) -> CrawlPhase {
        match phase {
            CrawlPhase::FetchingListing { page } => self.fetch_listing(page).await,
            CrawlPhase::DiscoveringLinks { page, html } => self.discover_links(page, &html),
            CrawlPhase::ProcessingArticle {
                page,
                pending,
                found_new,
            } => self.process_next_article(page, pending, found_new).await,
            terminal => terminal,
        }
    }

    async fn fetch_listing(&mut self, page: u32) -> CrawlPhase {
        self.state.set_page_cursor(page);
        let url = self.listing_page_url(page);
        tracing::info!("Fetching listing page: {}", url);

        match self.fetcher.fetch(&url, FetchMode::Text).await.into_text() {
            Ok(html) => {
                self.state.counters_mut().listing_pages_fetched += 1;
                CrawlPhase::DiscoveringLinks { page, html }
            }
            Err(failure) => {
                if failure.is_status() && page > 1 {
                    tracing::info!(
                        "Listing page {} is not available ({}), treating it as the last page",
                        page,
                        failure
                    );
                } else {
                    tracing::warn!("Failed to fetch listing page {}, stopping: {}", page, failure);
                }
                CrawlPhase::Completed(CompletionReason::ListingUnavailable)
            }
        }
    }

    fn discover_links(&mut self, page: u32, html: &str) -> CrawlPhase {
        let links = extract_article_links(html);

        if links.is_empty() {
            if page == 1 {
                tracing::warn!(
                    "No article links found on the first page. Check selectors or page URL."
                );
                return CrawlPhase::Completed(CompletionReason::NothingFound);
            }
            tracing::info!("No more article links found, stopping pagination");
            return CrawlPhase::Completed(CompletionReason::EndOfPagination);
        }

        tracing::info!("Found {} links on page {}", links.len(), page);
        CrawlPhase::ProcessingArticle {
            page,
            pending: VecDeque::from(links),
            found_new: false,
        }
    }

    async fn process_next_article(
        &mut self,
        page: u32,
        mut pending: VecDeque<String>,
        found_new: bool,
    ) -> CrawlPhase {
        let Some(href) = pending.pop_front() else {
            return self.finish_listing_page(page, found_new).await;
        };

        let Some(article_url) = resolve_link(&href, &self.base_url) else {
            tracing::warn!("Skipping unusable article link '{}' on page {}", href, page);
            return CrawlPhase::ProcessingArticle {
                page,
                pending,
                found_new,
            };
        };
        let article_url = article_url.to_string();

        if !self.state.mark_visited(&article_url) {
            tracing::debug!("Skipping already visited article {}", article_url);
            return CrawlPhase::ProcessingArticle {
                page,
                pending,
                found_new,
            };
        }

        self.process_article(&article_url).await;

        let cap = self.config.crawler.max_articles;
        if self.state.is_at_cap(cap) {
            tracing::info!("Reached limit of {} articles. Stopping crawl.", cap);
            return CrawlPhase::Completed(CompletionReason::CapReached);
        }

        pause(self.config.crawler.article_delay_ms).await;
        CrawlPhase::ProcessingArticle {
            page,
            pending,
            found_new: true,
        }
    }

    /// Extracts one article; failures are logged and contribute nothing
    async fn process_article(&mut self, article_url: &str) {
        tracing::info!("Processing article: {}", article_url);
        self.state.counters_mut().articles_attempted += 1;

        match self.extractor.extract_article_content(article_url).await {
            Ok(Some(record)) => self.state.push_result(record),
            Ok(None) => {
                self.state.counters_mut().articles_unavailable += 1;
                tracing::warn!("Failed to extract content for {}", article_url);
            }
            Err(e) => {
                self.state.counters_mut().articles_errored += 1;
                tracing::error!("Error processing article {}: {}", article_url, e);
            }
        }
    }

    async fn finish_listing_page(&mut self, page: u32, found_new: bool) -> CrawlPhase {
        if !found_new && page > 1 {
            tracing::info!("No new unique articles found on page {}. Stopping.", page);
            return CrawlPhase::Completed(CompletionReason::Stalled);
        }

        tracing::info!("Moving to page {}", page + 1);
        pause(self.config.crawler.listing_delay_ms).await;
        CrawlPhase::FetchingListing { page: page + 1 }
    }
}

/// Courtesy delay toward the origin site
async fn pause(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

/// Runs a complete crawl against the configured site and saves the results
///
/// This function orchestrates the entire crawl process:
///
/// 1. Build the HTTP fetcher and OCR client
/// 2. Run the coordinator until completion or interruption
/// 3. Save the collected records to a new JSON document
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `interrupt` - Signal checked between crawl steps
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; `saved_to` is None if saving failed
/// * `Err(CrawlerError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use tatce_crawler::config::Config;
/// use tatce_crawler::crawler::{run_crawl, InterruptSignal};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let interrupt = InterruptSignal::new();
/// interrupt.listen_for_ctrl_c();
/// let report = run_crawl(Config::default(), interrupt).await?;
/// println!("{} articles", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, interrupt: InterruptSignal) -> Result<CrawlReport, CrawlerError> {
    let output = config.output.clone();
    let coordinator = Coordinator::with_http(config, interrupt)?;

    let mut report = coordinator.run().await;
    if report.was_interrupted() {
        tracing::info!("Crawl interrupted. Saving progress...");
    }

    report.saved_to = save_results(&report.records, &output);
    Ok(report)
}
