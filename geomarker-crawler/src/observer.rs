//! Progress and failure events emitted during a crawl.

use std::error::Error as StdError;

use geomarker_core::{Article, Cursor, FetchError};
use tokio::task::JoinError;

use crate::{CrawlError, CrawlReport, SinkSummary};

/// Receives crawl events.
///
/// The pipeline never logs directly; it reports here so callers decide where
/// events go. Implementations are shared with the write workers and must be
/// `Send + Sync`.
pub trait CrawlObserver: Send + Sync {
    /// A listing page starting at `cursor` returned `articles` entries.
    fn page_fetched(&self, cursor: &Cursor, articles: usize);

    /// The lookup for `article` found no coordinates.
    fn coordinates_missing(&self, article: &Article);

    /// The lookup for `article` failed; the article is skipped.
    fn resolution_failed(&self, article: &Article, error: &FetchError);

    /// Writing the marker for `page_id` failed; the marker is dropped.
    fn write_failed(&self, page_id: u64, error: &(dyn StdError + 'static));

    /// `count` queued markers were discarded on cancellation.
    fn writes_abandoned(&self, count: u64);

    /// A write worker ended abnormally.
    fn worker_failed(&self, error: &JoinError);

    /// The listing was exhausted and the sink drained.
    fn crawl_finished(&self, report: &CrawlReport);

    /// The run ended early; the sink was still drained.
    fn crawl_aborted(&self, error: &CrawlError, sink: &SinkSummary);
}

/// Observer that forwards every event to the `log` facade.
///
/// Missing coordinates are routine and logged at debug level. Lookup and
/// write failures are errors, abandoned writes are warnings, and run
/// boundaries are info.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn page_fetched(&self, cursor: &Cursor, articles: usize) {
        log::debug!("fetched listing page at {cursor} with {articles} articles");
    }

    fn coordinates_missing(&self, article: &Article) {
        log::debug!(
            "no coordinates for page {} ({})",
            article.page_id,
            article.title
        );
    }

    fn resolution_failed(&self, article: &Article, error: &FetchError) {
        log::error!(
            "coordinate lookup failed for page {} ({}): {error}",
            article.page_id,
            article.title
        );
    }

    fn write_failed(&self, page_id: u64, error: &(dyn StdError + 'static)) {
        log::error!("failed to store marker for page {page_id}: {error}");
    }

    fn writes_abandoned(&self, count: u64) {
        log::warn!("abandoned {count} queued marker writes on cancellation");
    }

    fn worker_failed(&self, error: &JoinError) {
        log::error!("marker write worker ended abnormally: {error}");
    }

    fn crawl_finished(&self, report: &CrawlReport) {
        log::info!("crawl finished: {report}");
    }

    fn crawl_aborted(&self, error: &CrawlError, sink: &SinkSummary) {
        log::warn!(
            "crawl stopped: {error}; {} markers written, {} write failures",
            sink.written,
            sink.failed
        );
    }
}
