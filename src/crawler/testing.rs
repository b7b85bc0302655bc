//! In-memory fetcher and OCR service used by the crawler unit tests

use crate::crawler::fetcher::{FetchFailure, FetchMode, FetchResult, PageFetcher};
use crate::crawler::interrupt::InterruptSignal;
use crate::ocr::{OcrOutcome, OcrService};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves pages from a map; unknown URLs answer HTTP 404
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    hits: Mutex<HashMap<String, usize>>,
    interrupt_on: Option<(String, InterruptSignal)>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Triggers `signal` while serving `url`
    pub fn with_interrupt_on(mut self, url: &str, signal: InterruptSignal) -> Self {
        self.interrupt_on = Some((url.to_string(), signal));
        self
    }

    /// Number of times `url` was requested
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> FetchResult {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        if let Some((trigger_url, signal)) = &self.interrupt_on {
            if trigger_url == url {
                signal.trigger();
            }
        }

        match (self.pages.get(url), mode) {
            (Some(body), FetchMode::Text) => FetchResult::Text { body: body.clone() },
            (Some(body), FetchMode::Binary) => FetchResult::Binary {
                bytes: body.clone().into_bytes(),
            },
            (None, _) => FetchResult::Failure(FetchFailure::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Records every OCR request and answers with a canned outcome
pub struct RecordingOcr {
    calls: Mutex<Vec<String>>,
    fixed: Option<OcrOutcome>,
}

impl RecordingOcr {
    /// Answers `"text of <url>"` for every file
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fixed: None,
        }
    }

    /// Answers `outcome` for every file
    pub fn failing(outcome: OcrOutcome) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fixed: Some(outcome),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrService for RecordingOcr {
    async fn ocr_file_url(&self, file_url: &str) -> OcrOutcome {
        self.calls.lock().unwrap().push(file_url.to_string());
        match &self.fixed {
            Some(outcome) => outcome.clone(),
            None => OcrOutcome::Text(format!("text of {}", file_url)),
        }
    }
}
