//! Article records produced by the crawl
//!
//! These are the types serialized into the output document. Field names are
//! camelCase: `imageOcrResults`, `fileExtractions` and so on.

use serde::{Deserialize, Serialize};

/// Sentinel stored in text fields whose markup could not be located
pub const NOT_AVAILABLE: &str = "N/A";

/// One article's extracted state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Absolute article URL, unique across a crawl
    pub url: String,
    pub title: String,
    /// Event date as shown on the page, not the publication timestamp
    pub date: String,
    pub content: String,
    /// OCR of the first inline image; never more than one entry
    pub image_ocr_results: Vec<ImageOcrResult>,
    /// Linked PDFs and images, unique by `file_url`
    pub file_extractions: Vec<FileExtraction>,
}

impl ArticleRecord {
    /// Creates a record with every text field set to [`NOT_AVAILABLE`]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: NOT_AVAILABLE.to_string(),
            date: NOT_AVAILABLE.to_string(),
            content: NOT_AVAILABLE.to_string(),
            image_ocr_results: Vec::new(),
            file_extractions: Vec::new(),
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != NOT_AVAILABLE
    }

    /// Iterates over every OCR text attached to this record
    pub fn ocr_texts(&self) -> impl Iterator<Item = &str> {
        self.image_ocr_results
            .iter()
            .map(|image| image.ocr_text.as_str())
            .chain(
                self.file_extractions
                    .iter()
                    .filter_map(|file| file.extracted_text.as_deref()),
            )
    }
}

/// OCR result for an inline article image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOcrResult {
    pub image_url: String,
    pub ocr_text: String,
}

/// Text extracted from a file linked from the article body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExtraction {
    pub file_url: String,
    pub link_text: String,
    /// `None` only when extraction was never attempted; failed attempts
    /// carry diagnostic text
    pub extracted_text: Option<String>,
}
