//! Core domain types for the geomarker crawler.
//!
//! The crawler walks a paged article listing, resolves coordinates for each
//! article and persists the georeferenced result. This crate holds the values
//! that flow between those stages and the traits that mark the boundaries:
//!
//! - [`ListingSource`] yields one [`ListingPage`] per [`Cursor`].
//! - [`CoordinateResolver`] turns an [`Article`] into a [`Resolution`].
//! - [`MarkerStore`] upserts a [`Marker`] keyed by page id.
//!
//! Adapters for HTTP and databases live in `geomarker-data`; the pipeline that
//! drives them lives in `geomarker-crawler`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod article;
mod coordinates;
mod cursor;
mod fetch;
mod marker;
mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use article::Article;
pub use coordinates::{Coordinates, CoordinatesError};
pub use cursor::{Cursor, ListingPage, PageSize, PageSizeError};
pub use fetch::{CoordinateResolver, FetchError, ListingSource, Resolution};
pub use marker::{Marker, WGS84_SRID, WIKIPEDIA_SOURCE};
pub use store::MarkerStore;
