//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Phases of the pagination state machine (fetching a listing,
//!   discovering links, processing articles, completed, interrupted)
//! - `CompletionReason`: Why a crawl completed on its own
//! - `CrawlState`: Visited article URLs, collected records and the page cursor

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::{CompletionReason, CrawlPhase};
pub use crawl_state::{CrawlCounters, CrawlState};
