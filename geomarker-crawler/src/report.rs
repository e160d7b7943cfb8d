//! Counters returned by a crawl run.

use std::fmt;

/// Progress of the listing walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Listing pages fetched.
    pub pages: u64,
    /// Articles seen across all pages.
    pub articles: u64,
    /// Markers handed to the sink.
    pub submitted: u64,
    /// Articles without coordinates.
    pub without_coordinates: u64,
    /// Articles whose lookup failed.
    pub resolution_failures: u64,
}

/// Outcome of the write pool once drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkSummary {
    /// Markers written successfully.
    pub written: u64,
    /// Markers whose write failed.
    pub failed: u64,
    /// Markers still queued when the run was cancelled.
    pub abandoned: u64,
    /// Worker tasks that panicked or were aborted.
    pub failed_workers: u64,
}

/// Combined result of a completed crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Listing walk counters.
    pub walk: WalkSummary,
    /// Write pool counters.
    pub sink: SinkSummary,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} articles, {} markers written, {} without coordinates, {} lookup failures, {} write failures",
            self.walk.pages,
            self.walk.articles,
            self.sink.written,
            self.walk.without_coordinates,
            self.walk.resolution_failures,
            self.sink.failed,
        )
    }
}
