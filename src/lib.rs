//! Tatce crawler: news harvester for tatce.cz
//!
//! This crate walks the paginated "aktuality" listing of the Tatce municipality
//! website, extracts every article it finds and enriches the article text with
//! OCR output for linked PDFs and images, then persists the collected records
//! as a JSON document.

pub mod config;
pub mod crawler;
pub mod links;
pub mod models;
pub mod ocr;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawler startup
///
/// Failures that happen while crawling are absorbed into degraded records or
/// diagnostic text; only these reach the caller.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlReport, InterruptSignal};
pub use models::{ArticleRecord, FileExtraction, ImageOcrResult, NOT_AVAILABLE};
pub use state::{CompletionReason, CrawlPhase, CrawlState};
