//! Orchestration of a single crawl run.

use std::sync::Arc;

use geomarker_core::{CoordinateResolver, ListingSource, MarkerStore};
use tokio_util::sync::CancellationToken;

use crate::{CrawlConfig, CrawlError, CrawlObserver, CrawlReport, LogObserver, MarkerSink, Walker};

/// Runs the listing walk against a store through a bounded write pool.
///
/// The pipeline is generic over the boundary traits: a listing source, a
/// coordinate resolver, and a marker store. Each [`Pipeline::run`] starts a
/// fresh sink, walks from the first page, and drains the sink before
/// returning, whether the walk succeeded or not.
///
/// # Examples
/// ```
/// use geomarker_core::test_support::{MemoryMarkerStore, ScriptedListing, ScriptedResolver};
/// use geomarker_core::{Article, ListingPage};
/// use geomarker_crawler::{CancellationToken, Pipeline};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), geomarker_crawler::CrawlError> {
/// let listing = ScriptedListing::default()
///     .with_page("", ListingPage::new(vec![Article::new(7, "London")], ""));
/// let resolver = ScriptedResolver::default().with_coordinates(7, 51.5, -0.12);
/// let pipeline = Pipeline::new(listing, resolver, MemoryMarkerStore::default());
///
/// let report = pipeline.run(CancellationToken::new()).await?;
/// assert_eq!(report.sink.written, 1);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<L, R, S>
where
    S: MarkerStore,
{
    walker: Walker<L, R>,
    store: Arc<S>,
    config: CrawlConfig,
    observer: Arc<dyn CrawlObserver>,
}

impl<L, R, S> Pipeline<L, R, S>
where
    L: ListingSource,
    R: CoordinateResolver,
    S: MarkerStore + 'static,
{
    /// Construct a pipeline using default configuration.
    pub fn new(listing: L, resolver: R, store: S) -> Self {
        Self::with_config(listing, resolver, store, CrawlConfig::default())
    }

    /// Construct a pipeline with explicit configuration.
    pub fn with_config(listing: L, resolver: R, store: S, config: CrawlConfig) -> Self {
        let observer: Arc<dyn CrawlObserver> = Arc::new(LogObserver);
        Self {
            walker: Walker::new(listing, resolver, config.page_size)
                .with_observer(Arc::clone(&observer)),
            store: Arc::new(store),
            config,
            observer,
        }
    }

    /// Replace the observer used by the walk and the write pool.
    #[must_use]
    pub fn with_observer(self, observer: Arc<dyn CrawlObserver>) -> Self {
        Self {
            walker: self.walker.with_observer(Arc::clone(&observer)),
            store: self.store,
            config: self.config,
            observer,
        }
    }

    /// Shared handle to the store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Crawl the whole listing once.
    ///
    /// Must be called from within a Tokio runtime; the write workers are
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns the walk's fatal error: [`CrawlError::Listing`] for a failed
    /// page, or [`CrawlError::Cancelled`] when `cancel` fires. A walk that
    /// completed is still reported as cancelled if the cancel abandoned
    /// queued writes while the sink drained. In every case the sink has been
    /// drained and its totals reported to the observer.
    pub async fn run(&self, cancel: CancellationToken) -> Result<CrawlReport, CrawlError> {
        let sink = MarkerSink::start(
            Arc::clone(&self.store),
            &self.config,
            Arc::clone(&self.observer),
            cancel.clone(),
        );
        let walked = self.walker.walk(&sink, &cancel).await;
        let sink_summary = sink.finish().await;

        // A cancel that lands while the sink drains still loses writes.
        let walked = match walked {
            Ok(_) if cancel.is_cancelled() && sink_summary.abandoned > 0 => {
                Err(CrawlError::Cancelled)
            }
            other => other,
        };

        match walked {
            Ok(walk) => {
                let report = CrawlReport {
                    walk,
                    sink: sink_summary,
                };
                self.observer.crawl_finished(&report);
                Ok(report)
            }
            Err(error) => {
                self.observer.crawl_aborted(&error, &sink_summary);
                Err(error)
            }
        }
    }
}
