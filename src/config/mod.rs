//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so an empty file (or no file at all) yields the
//! configuration used against the live site.
//!
//! # Example
//!
//! ```no_run
//! use tatce_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tatce-crawler.toml")).unwrap();
//! println!("Crawler will stop after {} articles", config.crawler.max_articles);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OcrConfig, OutputConfig, SiteConfig, UserAgentConfig,
    SHARED_OCR_API_KEY,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_default_config,
    DEFAULT_CONFIG_FILE,
};
pub use validation::validate;
