//! HTTP client for the OCR.space compatible API

use crate::config::OcrConfig;
use crate::ocr::response::parse_ocr_response;
use crate::ocr::{OcrFailure, OcrOutcome, OcrService};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Text stored when the service found nothing to recognize
pub const NO_TEXT_DETECTED: &str = "[OCR completed, but no text detected]";

/// OCR client submitting file URLs to the remote API
///
/// When the shared demo key is configured every call ends with a fixed pause,
/// whether it succeeded or not. The pause is part of the call's latency.
#[derive(Debug, Clone)]
pub struct OcrClient {
    client: Client,
    config: OcrConfig,
    pacing: Option<Duration>,
}

impl OcrClient {
    /// Creates a client with the configured OCR timeout
    pub fn new(config: &OcrConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let pacing = if config.uses_shared_key() {
            tracing::warn!(
                "Using the shared OCR API key; calls are paced {}ms apart and limits may apply",
                config.pacing_ms
            );
            Some(Duration::from_millis(config.pacing_ms))
        } else {
            None
        };

        Ok(Self {
            client,
            config: config.clone(),
            pacing,
        })
    }

    /// Returns the pause applied after each call, if any
    pub fn pacing(&self) -> Option<Duration> {
        self.pacing
    }

    /// Form fields sent with every request
    fn form_fields(&self, file_url: &str) -> Vec<(&'static str, String)> {
        vec![
            ("url", file_url.to_string()),
            ("isOverlayRequired", "false".to_string()),
            ("language", self.config.language.clone()),
            (
                "detectOrientation",
                self.config.detect_orientation.to_string(),
            ),
            ("apikey", self.config.api_key.clone()),
            ("scale", self.config.scale.to_string()),
            ("OCREngine", self.config.engine.to_string()),
        ]
    }

    /// Performs the request without pacing
    async fn request(&self, file_url: &str) -> OcrOutcome {
        let response = match self
            .client
            .post(&self.config.endpoint)
            .form(&self.form_fields(file_url))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return OcrOutcome::Failed(classify_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return OcrOutcome::Failed(OcrFailure::Transport {
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        match response.text().await {
            Ok(body) => parse_ocr_response(&body),
            Err(e) => OcrOutcome::Failed(classify_error(&e)),
        }
    }
}

#[async_trait]
impl OcrService for OcrClient {
    async fn ocr_file_url(&self, file_url: &str) -> OcrOutcome {
        let started = Instant::now();
        let outcome = self.request(file_url).await;

        match &outcome {
            OcrOutcome::Text(text) => {
                tracing::debug!("OCR of {} returned {} chars", file_url, text.chars().count())
            }
            OcrOutcome::NoTextDetected => {
                tracing::info!("OCR completed for {}, but no text detected", file_url)
            }
            OcrOutcome::Failed(failure) => {
                tracing::warn!("OCR failed for {}: {}", file_url, failure)
            }
        }

        if let Some(pacing) = self.pacing {
            tokio::time::sleep(pacing).await;
        }

        tracing::debug!("OCR call for {} took {:?}", file_url, started.elapsed());
        outcome
    }
}

/// Maps a reqwest error to an OCR failure class
fn classify_error(error: &reqwest::Error) -> OcrFailure {
    if error.is_timeout() {
        OcrFailure::Timeout
    } else if error.is_decode() {
        OcrFailure::Decode {
            message: error.to_string(),
        }
    } else {
        OcrFailure::Transport {
            message: error.to_string(),
        }
    }
}
