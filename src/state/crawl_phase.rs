/// Crawl phase definitions for the pagination state machine
///
/// The coordinator moves through these phases one transition at a time until
/// it reaches one of the terminal phases.
use std::collections::VecDeque;
use std::fmt;

/// Why a crawl reached the `Completed` phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionReason {
    /// A listing page could not be fetched
    ListingUnavailable,

    /// The first listing page had no recognizable article links
    NothingFound,

    /// A later listing page had no article links
    EndOfPagination,

    /// A later listing page only repeated already visited articles
    Stalled,

    /// The configured article cap was reached
    CapReached,
}

impl CompletionReason {
    /// Short machine-friendly name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListingUnavailable => "listing_unavailable",
            Self::NothingFound => "nothing_found",
            Self::EndOfPagination => "end_of_pagination",
            Self::Stalled => "stalled",
            Self::CapReached => "cap_reached",
        }
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the current phase of a crawl
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// The listing page with this 1-based number is about to be fetched
    FetchingListing { page: u32 },

    /// A listing page was fetched and its article links are being extracted
    DiscoveringLinks { page: u32, html: String },

    /// Article hrefs of a listing page are being processed one by one
    ///
    /// `found_new` records whether any href on this page was not visited before.
    ProcessingArticle {
        page: u32,
        pending: VecDeque<String>,
        found_new: bool,
    },

    // ===== Terminal Phases =====
    /// The crawl ended on its own
    Completed(CompletionReason),

    /// The crawl was stopped by an external signal
    Interrupted,
}

impl CrawlPhase {
    /// Returns true if no further transitions follow this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Interrupted)
    }

    /// Returns the completion reason for `Completed`, None otherwise
    pub fn completion_reason(&self) -> Option<CompletionReason> {
        match self {
            Self::Completed(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Short name of the phase for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchingListing { .. } => "fetching_listing",
            Self::DiscoveringLinks { .. } => "discovering_links",
            Self::ProcessingArticle { .. } => "processing_article",
            Self::Completed(_) => "completed",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingListing { page } => write!(f, "fetching_listing(page {})", page),
            Self::DiscoveringLinks { page, .. } => write!(f, "discovering_links(page {})", page),
            Self::ProcessingArticle { page, pending, .. } => {
                write!(f, "processing_article(page {}, {} pending)", page, pending.len())
            }
            Self::Completed(reason) => write!(f, "completed({})", reason),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
