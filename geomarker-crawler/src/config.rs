//! Tuning knobs for a crawl run.

use std::num::NonZeroUsize;

use geomarker_core::PageSize;

/// Default number of concurrent store writers.
pub const DEFAULT_WRITE_WORKERS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(workers) => workers,
    None => NonZeroUsize::MIN,
};

/// Default number of markers that may wait for a writer.
pub const DEFAULT_QUEUE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Configuration for [`crate::Pipeline`].
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use geomarker_core::PageSize;
/// use geomarker_crawler::CrawlConfig;
///
/// let config = CrawlConfig::default()
///     .with_page_size(PageSize::new(100).expect("valid page size"))
///     .with_write_workers(NonZeroUsize::new(8).expect("non-zero"));
/// assert_eq!(config.page_size.get(), 100);
/// assert_eq!(config.write_workers.get(), 8);
/// assert_eq!(config.queue_capacity.get(), 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Articles requested per listing page.
    pub page_size: PageSize,
    /// Upper bound on concurrent store writes.
    pub write_workers: NonZeroUsize,
    /// Markers that may queue before submission waits.
    pub queue_capacity: NonZeroUsize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            write_workers: DEFAULT_WRITE_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl CrawlConfig {
    /// Set the listing page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the number of write workers.
    #[must_use]
    pub const fn with_write_workers(mut self, workers: NonZeroUsize) -> Self {
        self.write_workers = workers;
        self
    }

    /// Set the write queue capacity.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}
