//! Statistics generation from a finished crawl
//!
//! This module provides functionality for summarizing a [`CrawlReport`]
//! and displaying the summary.

use crate::crawler::CrawlReport;
use crate::ocr::is_diagnostic;
use std::path::PathBuf;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// How the crawl ended
    pub outcome: String,

    pub interrupted: bool,

    /// Listing pages fetched successfully
    pub listing_pages: u32,

    /// Article URLs handed to the extractor
    pub articles_attempted: u32,

    /// Records collected
    pub articles_collected: usize,

    /// Articles whose page could not be fetched or extracted
    pub articles_failed: u32,

    /// Article links skipped because they were already visited
    pub duplicate_links: u32,

    /// Inline images sent to OCR
    pub inline_images: usize,

    /// Linked files sent to OCR
    pub linked_files: usize,

    /// OCR results that are diagnostics instead of text
    pub ocr_failures: usize,

    /// Records whose title could not be found
    pub untitled_articles: usize,

    pub duration_secs: i64,

    pub saved_to: Option<PathBuf>,
}

impl CrawlStatistics {
    /// Summarizes a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        let records = &report.records;
        let counters = report.counters;

        Self {
            outcome: report.outcome.to_string(),
            interrupted: report.was_interrupted(),
            listing_pages: counters.listing_pages_fetched,
            articles_attempted: counters.articles_attempted,
            articles_collected: records.len(),
            articles_failed: counters.articles_unavailable + counters.articles_errored,
            duplicate_links: counters.duplicate_links,
            inline_images: records.iter().map(|r| r.image_ocr_results.len()).sum(),
            linked_files: records.iter().map(|r| r.file_extractions.len()).sum(),
            ocr_failures: records
                .iter()
                .flat_map(|r| r.ocr_texts())
                .filter(|text| is_diagnostic(text))
                .count(),
            untitled_articles: records.iter().filter(|r| !r.has_title()).count(),
            duration_secs: report.duration().num_seconds(),
            saved_to: report.saved_to.clone(),
        }
    }

    /// Total OCR requests made
    pub fn ocr_requests(&self) -> usize {
        self.inline_images + self.linked_files
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Outcome: {}", stats.outcome);
    if stats.interrupted {
        println!("  (stopped early, partial results)");
    }
    println!("  Listing pages fetched: {}", stats.listing_pages);
    println!("  Duration: {}s", stats.duration_secs);
    println!();

    println!("Articles:");
    println!("  Attempted: {}", stats.articles_attempted);
    println!("  Collected: {}", stats.articles_collected);
    println!("  Failed: {}", stats.articles_failed);
    println!("  Duplicate links skipped: {}", stats.duplicate_links);
    if stats.untitled_articles > 0 {
        println!("  Without title: {}", stats.untitled_articles);
    }
    println!();

    println!("OCR:");
    println!("  Inline images: {}", stats.inline_images);
    println!("  Linked files: {}", stats.linked_files);
    let ok = stats.ocr_requests() - stats.ocr_failures;
    let success_rate = if stats.ocr_requests() > 0 {
        (ok as f64 / stats.ocr_requests() as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  Success Rate: {:.1}% ({} / {} requests returned text)",
        success_rate,
        ok,
        stats.ocr_requests()
    );
    println!();

    match &stats.saved_to {
        Some(path) => println!("✓ Results saved to: {}", path.display()),
        None => println!("✗ Results were not saved"),
    }
}
