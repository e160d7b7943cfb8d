//! Cursor-driven walk over the article listing.

use std::sync::Arc;

use geomarker_core::{
    CoordinateResolver, Cursor, ListingPage, ListingSource, Marker, PageSize, Resolution,
};
use tokio_util::sync::CancellationToken;

use crate::{CrawlError, CrawlObserver, LogObserver, MarkerSink, WalkSummary};

/// Walks every listing page and resolves each article in order.
///
/// The walk is strictly sequential: one page request, then one lookup per
/// article, each awaited before the next. Located articles go to the sink
/// without waiting for their write.
pub struct Walker<L, R> {
    listing: L,
    resolver: R,
    page_size: PageSize,
    observer: Arc<dyn CrawlObserver>,
}

impl<L, R> Walker<L, R>
where
    L: ListingSource,
    R: CoordinateResolver,
{
    /// Construct a walker that logs through [`LogObserver`].
    pub fn new(listing: L, resolver: R, page_size: PageSize) -> Self {
        Self {
            listing,
            resolver,
            page_size,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Walk from the first page until the listing returns an empty cursor.
    ///
    /// Lookup failures and articles without coordinates are counted and
    /// skipped. Listing requests and lookups race `cancel`, so a cancelled
    /// run stops without waiting for the request in flight.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Listing`] when a page cannot be fetched or
    /// decoded, and [`CrawlError::Cancelled`] when `cancel` fires.
    pub async fn walk(
        &self,
        sink: &MarkerSink,
        cancel: &CancellationToken,
    ) -> Result<WalkSummary, CrawlError> {
        let mut summary = WalkSummary::default();
        let mut cursor = Cursor::start();

        loop {
            let page = self.fetch_page(&cursor, cancel).await?;
            summary.pages += 1;
            self.observer.page_fetched(&cursor, page.articles.len());

            let ListingPage { articles, next } = page;
            for article in articles {
                summary.articles += 1;
                let resolution = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(CrawlError::Cancelled),
                    resolution = self.resolver.resolve(&article) => resolution,
                };
                match resolution {
                    Ok(Resolution::Found(coordinates)) => {
                        sink.submit(Marker::from_article(article, coordinates))
                            .await?;
                        summary.submitted += 1;
                    }
                    Ok(Resolution::NotFound) => {
                        summary.without_coordinates += 1;
                        self.observer.coordinates_missing(&article);
                    }
                    Err(error) => {
                        summary.resolution_failures += 1;
                        self.observer.resolution_failed(&article, &error);
                    }
                }
            }

            if next.is_empty() {
                return Ok(summary);
            }
            cursor = next;
        }
    }

    async fn fetch_page(
        &self,
        cursor: &Cursor,
        cancel: &CancellationToken,
    ) -> Result<ListingPage, CrawlError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(CrawlError::Cancelled),
            page = self.listing.fetch_page(cursor, self.page_size) => {
                page.map_err(|source| CrawlError::Listing {
                    cursor: cursor.clone(),
                    source,
                })
            }
        }
    }
}
