//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the collected article records to a uniquely-named JSON document
//! - Reading a document back
//! - Summarizing a finished crawl as statistics

mod json;
pub mod stats;

pub use json::{candidate_path, load_results, save_results, write_results};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
