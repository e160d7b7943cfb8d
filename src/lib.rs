//! Facade crate for the geomarker crawler.
//!
//! This crate re-exports the domain types, the crawl pipeline, and the
//! MediaWiki client, and exposes the marker store backends behind feature
//! flags.

#![forbid(unsafe_code)]

pub use geomarker_core::{
    Article, CoordinateResolver, Coordinates, CoordinatesError, Cursor, FetchError, ListingPage,
    ListingSource, Marker, MarkerStore, PageSize, PageSizeError, Resolution, WIKIPEDIA_SOURCE,
};
pub use geomarker_crawler::{
    CancellationToken, CrawlConfig, CrawlError, CrawlObserver, CrawlReport, LogObserver,
    Pipeline, SinkSummary, WalkSummary,
};
pub use geomarker_data::mediawiki::{ClientBuildError, MediaWikiClient, MediaWikiConfig};
pub use geomarker_data::store::StoreError;

#[cfg(any(feature = "store-sqlite", feature = "store-postgres"))]
pub use geomarker_data::store::MarkerStoreBackend;

#[cfg(feature = "store-sqlite")]
pub use geomarker_data::store::SqliteMarkerStore;

#[cfg(feature = "store-postgres")]
pub use geomarker_data::store::{PgMarkerStore, PgSettings};
