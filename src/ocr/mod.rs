//! OCR module for the remote text recognition service
//!
//! Files are never downloaded by the crawler: the OCR service receives the
//! public URL of a PDF or image and fetches it itself. Every failure is
//! turned into an [`OcrOutcome`] instead of an error, so a broken attachment
//! never costs more than its own text.

mod client;
mod response;

pub use client::{OcrClient, NO_TEXT_DETECTED};
pub use response::parse_ocr_response;

use async_trait::async_trait;
use thiserror::Error;

/// Failure classes of an OCR call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrFailure {
    /// The service reported a processing error
    #[error("{message}")]
    Api { message: String },

    /// The service answered with JSON of an unknown shape
    #[error("Unexpected API response format. Response: {payload}")]
    UnexpectedFormat { payload: String },

    #[error("Timeout")]
    Timeout,

    /// Connection problem or non-success HTTP status
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// The response body was not JSON
    #[error("Could not decode JSON response: {message}")]
    Decode { message: String },
}

/// Result of recognizing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Text of all pages joined with `"\n---\n"`
    Text(String),

    /// The service processed the file but found no text
    NoTextDetected,

    Failed(OcrFailure),
}

impl OcrOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Renders the outcome as the text stored in an article record
    ///
    /// Failures become diagnostic text naming the file, so the record shows
    /// that extraction was attempted and why it produced nothing.
    pub fn into_text(self, file_url: &str) -> String {
        match self {
            Self::Text(text) => text,
            Self::NoTextDetected => NO_TEXT_DETECTED.to_string(),
            Self::Failed(OcrFailure::Api { message }) => {
                format!("OCR Error: {} for {}", message, file_url)
            }
            Self::Failed(OcrFailure::UnexpectedFormat { payload }) => format!(
                "OCR Error: Unexpected API response format for {}. Response: {}",
                file_url, payload
            ),
            Self::Failed(OcrFailure::Timeout) => {
                format!("OCR Error: Timeout processing {}", file_url)
            }
            Self::Failed(OcrFailure::Transport { message }) => {
                format!("OCR Error: Request failed for {}: {}", file_url, message)
            }
            Self::Failed(OcrFailure::Decode { .. }) => {
                format!("OCR Error: Could not decode JSON response for {}", file_url)
            }
        }
    }
}

/// Prefix shared by every OCR diagnostic text
pub const OCR_ERROR_PREFIX: &str = "OCR Error:";

/// Returns true if a stored text is an OCR diagnostic rather than content
pub fn is_diagnostic(text: &str) -> bool {
    text.starts_with(OCR_ERROR_PREFIX)
}

/// Capability to OCR a file given its public URL
#[async_trait]
pub trait OcrService: Send + Sync {
    async fn ocr_file_url(&self, file_url: &str) -> OcrOutcome;
}
