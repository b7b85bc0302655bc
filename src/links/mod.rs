//! Link resolution and classification
//!
//! Article pages reference images and documents with relative hrefs. This
//! module resolves them against the page URL and decides whether a target is
//! something the OCR service should look at.

use url::Url;

/// Extensions of documents sent to the OCR service as PDFs
pub const PDF_EXTENSIONS: &[&str] = &[".pdf"];

/// Image extensions the OCR service accepts
pub const OCR_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff"];

/// Kind of file a link points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// PDF document
    Pdf,
    /// Image in a format the OCR service accepts
    Image,
    /// Anything else (regular pages, archives, ...)
    Other,
}

impl FileKind {
    /// Returns true if the file should be sent to the OCR service
    pub fn is_ocr_eligible(&self) -> bool {
        matches!(self, Self::Pdf | Self::Image)
    }
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None if the link should be skipped:
/// - empty hrefs and fragment-only anchors
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not resolve to an http(s) URL
///
/// # Examples
///
/// ```
/// use tatce_crawler::links::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.tatce.cz/prakticke-info/aktuality/").unwrap();
/// let url = resolve_link("/files/plan.pdf", &base).unwrap();
/// assert_eq!(url.as_str(), "https://www.tatce.cz/files/plan.pdf");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}

/// Classifies a URL by the extension of its path
///
/// Query strings and fragments are ignored, matching is case-insensitive.
pub fn classify_file(url: &Url) -> FileKind {
    let path = url.path().to_ascii_lowercase();

    if PDF_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        FileKind::Pdf
    } else if OCR_IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

/// Returns the last path segment of a URL, used when a link has no text
pub fn file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}
