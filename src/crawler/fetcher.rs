//! HTTP fetcher implementation
//!
//! This module handles all requests to the origin site:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for listing and article pages (decoded text)
//! - GET requests for raw files (bytes)
//! - Error classification into typed failures
//!
//! There are no retries. A failed fetch is reported to the caller, which
//! skips the unit of work and carries on.

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use mime::Mime;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// How the response body should be returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Decode the body to a string using the declared or sniffed charset
    Text,
    /// Return the body bytes untouched
    Binary,
}

/// Why a fetch produced no content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchFailure {
    /// The URL that could not be fetched
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url } | Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }

    /// Returns true if the server answered with a non-success status
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Decoded page body
    Text { body: String },

    /// Raw file body
    Binary { bytes: Vec<u8> },

    /// Timeout, transport error or non-success status
    Failure(FetchFailure),
}

impl FetchResult {
    /// Returns the body as text, decoding binary bodies lossily as UTF-8
    pub fn into_text(self) -> Result<String, FetchFailure> {
        match self {
            Self::Text { body } => Ok(body),
            Self::Binary { bytes } => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Self::Failure(failure) => Err(failure),
        }
    }

    /// Returns the body as bytes
    pub fn into_bytes(self) -> Result<Vec<u8>, FetchFailure> {
        match self {
            Self::Text { body } => Ok(body.into_bytes()),
            Self::Binary { bytes } => Ok(bytes),
            Self::Failure(failure) => Err(failure),
        }
    }
}

/// Capability to fetch a URL
///
/// The coordinator and the article extractor only talk to the network through
/// this trait, so tests can serve pages from memory.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, never panicking and never returning an error type:
    /// every failure is a [`FetchResult::Failure`]
    async fn fetch(&self, url: &str, mode: FetchMode) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Total timeout charged to every request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tatce_crawler::config::UserAgentConfig;
/// use tatce_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(20)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher using the crawler's request timeout
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(crawler.request_timeout_secs),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> FetchResult {
        tracing::debug!("GET {} ({:?})", url, mode);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::Failure(classify_error(url, &e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::Failure(FetchFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let header_charset = declares_charset(response.headers());

        let result = match mode {
            FetchMode::Binary => response
                .bytes()
                .await
                .map(|bytes| FetchResult::Binary {
                    bytes: bytes.to_vec(),
                }),
            // reqwest decodes with the charset named in Content-Type
            FetchMode::Text if header_charset => response
                .text_with_charset("utf-8")
                .await
                .map(|body| FetchResult::Text { body }),
            FetchMode::Text => response.bytes().await.map(|bytes| FetchResult::Text {
                body: decode_body(&bytes),
            }),
        };

        result.unwrap_or_else(|e| FetchResult::Failure(classify_error(url, &e)))
    }
}

/// Maps a reqwest error to a fetch failure
fn classify_error(url: &str, error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchFailure::Transport {
            url: url.to_string(),
            message: format!("Connection failed: {}", error),
        }
    } else {
        FetchFailure::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Returns true if the Content-Type header names a charset
fn declares_charset(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Mime>().ok())
        .is_some_and(|mime| mime.get_param(mime::CHARSET).is_some())
}

/// Looks for a `<meta charset>` declaration in the first kilobyte of a page
pub fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let start = head.find("charset=")? + "charset=".len();
    let charset: String = head[start..]
        .trim_start_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        .collect();

    (!charset.is_empty()).then_some(charset)
}

/// Decodes a page body served without a charset in its Content-Type
///
/// Uses the `<meta>` declaration if there is one and UTF-8 otherwise;
/// unknown labels fall back to UTF-8 and a byte order mark overrides both.
pub fn decode_body(bytes: &[u8]) -> String {
    let encoding = sniff_meta_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
