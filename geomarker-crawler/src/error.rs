use geomarker_core::{Cursor, FetchError};
use thiserror::Error;

/// Errors that end a crawl run.
///
/// Per-article lookup and write failures are reported to the observer and
/// never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CrawlError {
    /// A listing page could not be fetched or decoded.
    #[error("failed to fetch listing page at cursor {cursor}")]
    Listing {
        /// Cursor of the failed request.
        cursor: Cursor,
        /// Underlying transport or decode failure.
        #[source]
        source: FetchError,
    },
    /// The run was cancelled before the listing was exhausted.
    #[error("crawl cancelled")]
    Cancelled,
}
