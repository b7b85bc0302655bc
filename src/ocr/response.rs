//! Interpretation of OCR API response bodies

use crate::ocr::{OcrFailure, OcrOutcome};
use serde::Deserialize;
use serde_json::Value;

/// Separator placed between the text of consecutive pages
pub const PAGE_SEPARATOR: &str = "\n---\n";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<ErrorMessage>,
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
}

/// The API sends either a list of messages or a single string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Many(Vec<String>),
    One(String),
}

impl ErrorMessage {
    fn first(&self) -> Option<&str> {
        match self {
            Self::Many(messages) => messages.first().map(String::as_str),
            Self::One(message) => Some(message.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: Option<String>,
}

/// Turns a raw response body into an outcome
///
/// Priority: processing error reported by the API, then parsed pages, then
/// anything else as an unexpected format.
pub fn parse_ocr_response(body: &str) -> OcrOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return OcrOutcome::Failed(OcrFailure::Decode {
                message: e.to_string(),
            })
        }
    };

    let response: OcrResponse = match serde_json::from_value(value.clone()) {
        Ok(response) => response,
        Err(_) => {
            return OcrOutcome::Failed(OcrFailure::UnexpectedFormat {
                payload: value.to_string(),
            })
        }
    };

    if response.is_errored_on_processing {
        let message = response
            .error_message
            .as_ref()
            .and_then(ErrorMessage::first)
            .unwrap_or("Unknown OCR Error")
            .to_string();
        return OcrOutcome::Failed(OcrFailure::Api { message });
    }

    match response.parsed_results {
        Some(pages) if !pages.is_empty() => {
            let text = pages
                .iter()
                .filter_map(|page| page.parsed_text.as_deref())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(PAGE_SEPARATOR);

            if text.is_empty() {
                OcrOutcome::NoTextDetected
            } else {
                OcrOutcome::Text(text)
            }
        }
        _ => OcrOutcome::Failed(OcrFailure::UnexpectedFormat {
            payload: value.to_string(),
        }),
    }
}
