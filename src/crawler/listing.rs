//! Listing page parser
//!
//! Extracts the article hrefs from one page of the paginated news listing.

use scraper::{Html, Selector};

/// Container holding the article list on a listing page
pub const LISTING_CONTAINER_SELECTOR: &str = "div.module_content.events.readable_list";

/// Link to a single article inside the listing container
pub const ARTICLE_LINK_SELECTOR: &str = "a.event-link";

/// Extracts article links from listing page HTML
///
/// Hrefs are returned as written in the page (usually relative), in document
/// order and without de-duplication: identity spans several listing pages, so
/// de-duplication belongs to the coordinator.
///
/// A page without the listing container yields an empty list; the two cases
/// (no container, empty container) are distinguished only in the log.
///
/// # Example
///
/// ```
/// use tatce_crawler::crawler::extract_article_links;
///
/// let html = r#"<div class="module_content events readable_list">
///     <a class="event-link" href="/aktuality/svoz-odpadu">Svoz odpadu</a>
/// </div>"#;
/// assert_eq!(extract_article_links(html), vec!["/aktuality/svoz-odpadu"]);
/// ```
pub fn extract_article_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let (Ok(container_selector), Ok(link_selector)) = (
        Selector::parse(LISTING_CONTAINER_SELECTOR),
        Selector::parse(ARTICLE_LINK_SELECTOR),
    ) else {
        tracing::error!("Listing selectors failed to parse");
        return Vec::new();
    };

    let Some(container) = document.select(&container_selector).next() else {
        tracing::warn!(
            "No article container ({}) found; the page structure may have changed",
            LISTING_CONTAINER_SELECTOR
        );
        return Vec::new();
    };

    let links: Vec<String> = container
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    if links.is_empty() {
        tracing::debug!("Article container found but it holds no article links");
    }

    links
}
