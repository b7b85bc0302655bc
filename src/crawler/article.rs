//! Article page extraction
//!
//! Extraction runs in two steps:
//! 1. [`parse_article`] reads the HTML synchronously and produces an
//!    [`ArticlePage`]: title, date, body text and the files worth OCR'ing.
//! 2. [`ArticleExtractor`] sends those files to the OCR service and assembles
//!    the final [`ArticleRecord`].
//!
//! Every step is best-effort. Missing markup degrades to `"N/A"` fields or
//! empty lists and is logged; it never fails the article.

use crate::crawler::fetcher::{FetchMode, PageFetcher};
use crate::links::{classify_file, file_name, resolve_link, FileKind};
use crate::models::{ArticleRecord, FileExtraction, ImageOcrResult};
use crate::ocr::OcrService;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Region of the page holding the article
pub const MAIN_REGION_SELECTOR: &str = "#gcm-main";

pub const TITLE_SELECTOR: &str = "h1";

/// Event date shown on the article; the insertion/update timestamps elsewhere
/// on the page are ignored on purpose
pub const EVENT_DATE_SELECTOR: &str = ".event-info-value";

/// Narrower body region inside the main region
pub const CONTENT_REGION_SELECTOR: &str = ".module_content";

/// Elements whose own text never counts as body text
const EXCLUDED_TEXT_OWNERS: &[&str] = &["script", "style", "noscript", "h1", "a"];

/// Appended to the link text of images that are linked rather than inline
pub const LINKED_IMAGE_SUFFIX: &str = " (Linked Image)";

/// Unexpected errors while extracting an article
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid article URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

/// File linked from the article body that will be sent to OCR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedFile {
    /// Absolute file URL
    pub url: String,
    pub link_text: String,
    pub kind: FileKind,
}

/// Everything read from an article page before any OCR happens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePage {
    /// False when the main region was missing; all other fields are empty then
    pub has_main_region: bool,
    pub title: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
    /// Absolute URL of the first inline image
    pub inline_image: Option<String>,
    /// Distinct OCR-eligible files in document order
    pub linked_files: Vec<LinkedFile>,
}

/// Parses an article page
///
/// # Arguments
///
/// * `html` - The article HTML
/// * `article_url` - The article URL, used to resolve relative image and file links
pub fn parse_article(html: &str, article_url: &Url) -> Result<ArticlePage, ExtractError> {
    let document = Html::parse_document(html);

    let main_selector = selector(MAIN_REGION_SELECTOR)?;
    let title_selector = selector(TITLE_SELECTOR)?;
    let date_selector = selector(EVENT_DATE_SELECTOR)?;
    let content_selector = selector(CONTENT_REGION_SELECTOR)?;
    let image_selector = selector("img")?;
    let anchor_selector = selector("a")?;

    let Some(main) = document.select(&main_selector).next() else {
        tracing::warn!(
            "Could not find main content area ({}) on {}",
            MAIN_REGION_SELECTOR,
            article_url
        );
        return Ok(ArticlePage::default());
    };

    let title = main
        .select(&title_selector)
        .next()
        .map(collapsed_text)
        .filter(|text| !text.is_empty());

    let date = main
        .select(&date_selector)
        .next()
        .map(collapsed_text)
        .filter(|text| !text.is_empty());

    let (content_region, narrowed) = match main.select(&content_selector).next() {
        Some(region) => (region, true),
        None => {
            tracing::warn!(
                "Using fallback content area ({}) for {}",
                MAIN_REGION_SELECTOR,
                article_url
            );
            (main, false)
        }
    };

    let mut body = body_text(content_region);
    if body.is_empty() && narrowed {
        body = region_text(main);
    }

    Ok(ArticlePage {
        has_main_region: true,
        title,
        date,
        content: (!body.is_empty()).then_some(body),
        inline_image: first_inline_image(content_region, article_url, &image_selector),
        linked_files: linked_files(content_region, article_url, &anchor_selector),
    })
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Text of an element with runs of whitespace collapsed to single spaces
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Body text: one trimmed line per text node, skipping text owned directly
/// by script, style, noscript, heading and anchor elements
fn body_text(region: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for node in region.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let owner = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|element| element.name()));
        if matches!(owner, Some(name) if EXCLUDED_TEXT_OWNERS.contains(&name)) {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join("\n")
}

/// Every text segment of a region, whitespace-collapsed, one per line
fn region_text(region: ElementRef<'_>) -> String {
    region
        .text()
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First inline image with a resolvable source
///
/// Only one inline image is ever OCR'd per article.
fn first_inline_image(region: ElementRef<'_>, article_url: &Url, images: &Selector) -> Option<String> {
    region
        .select(images)
        .filter_map(|img| img.value().attr("src"))
        .find_map(|src| resolve_link(src, article_url))
        .map(|url| url.to_string())
}

/// Distinct PDF and image links in document order
fn linked_files(region: ElementRef<'_>, article_url: &Url, anchors: &Selector) -> Vec<LinkedFile> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for anchor in region.select(anchors) {
        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, article_url))
        else {
            continue;
        };

        let kind = classify_file(&url);
        if !kind.is_ocr_eligible() || !seen.insert(url.to_string()) {
            continue;
        }

        let mut link_text = collapsed_text(anchor);
        if link_text.is_empty() {
            link_text = file_name(&url);
        }
        if kind == FileKind::Image {
            link_text.push_str(LINKED_IMAGE_SUFFIX);
        }

        files.push(LinkedFile {
            url: url.to_string(),
            link_text,
            kind,
        });
    }

    files
}

/// Fetches article pages and turns them into records
#[derive(Clone)]
pub struct ArticleExtractor {
    fetcher: Arc<dyn PageFetcher>,
    ocr: Arc<dyn OcrService>,
}

impl ArticleExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, ocr: Arc<dyn OcrService>) -> Self {
        Self { fetcher, ocr }
    }

    /// Extracts one article
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The page was fetched; the record may hold
    ///   `"N/A"` fields if markup was missing
    /// * `Ok(None)` - The page could not be fetched
    /// * `Err(ExtractError)` - Unexpected extraction error
    pub async fn extract_article_content(
        &self,
        article_url: &str,
    ) -> Result<Option<ArticleRecord>, ExtractError> {
        let url = Url::parse(article_url).map_err(|source| ExtractError::InvalidUrl {
            url: article_url.to_string(),
            source,
        })?;

        let html = match self.fetcher.fetch(article_url, FetchMode::Text).await.into_text() {
            Ok(html) => html,
            Err(failure) => {
                tracing::warn!("Failed to fetch article: {}", failure);
                return Ok(None);
            }
        };

        let page = parse_article(&html, &url)?;
        Ok(Some(self.build_record(article_url, page).await))
    }

    /// Runs OCR for the page's files and assembles the record
    async fn build_record(&self, article_url: &str, page: ArticlePage) -> ArticleRecord {
        let mut record = ArticleRecord::new(article_url);

        if let Some(title) = page.title {
            record.title = title;
        }
        if let Some(date) = page.date {
            record.date = date;
        }
        if let Some(content) = page.content {
            record.content = content;
        }

        if let Some(image_url) = page.inline_image {
            tracing::info!("  Processing image for OCR: {}", image_url);
            let ocr_text = self.ocr.ocr_file_url(&image_url).await.into_text(&image_url);
            record.image_ocr_results.push(ImageOcrResult {
                image_url,
                ocr_text,
            });
        }

        for file in page.linked_files {
            match file.kind {
                FileKind::Pdf => tracing::info!("  Sending PDF to OCR: {}", file.url),
                _ => tracing::info!("  Processing linked image for OCR: {}", file.url),
            }
            let text = self.ocr.ocr_file_url(&file.url).await.into_text(&file.url);
            record.file_extractions.push(FileExtraction {
                file_url: file.url,
                link_text: file.link_text,
                extracted_text: Some(text),
            });
        }

        record
    }
}
