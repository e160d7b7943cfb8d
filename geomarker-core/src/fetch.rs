//! Remote lookups: listing pages and per-article coordinates.
//!
//! Both traits are object safe through `async_trait` and require `Send + Sync`
//! so a single client can be shared between the walk and any caller that owns
//! an `Arc` to it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Article, Coordinates, Cursor, ListingPage, PageSize};

/// Outcome of a successful coordinate lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The article carries a position; the first one reported is used.
    Found(Coordinates),
    /// The article has no position. This is not an error.
    NotFound,
}

impl Resolution {
    /// Return the coordinates when the lookup found any.
    #[must_use]
    pub fn coordinates(self) -> Option<Coordinates> {
        match self {
            Self::Found(coordinates) => Some(coordinates),
            Self::NotFound => None,
        }
    }
}

/// Errors raised by remote lookups.
///
/// Every variant records the request URL so logs identify the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request did not complete before its deadline.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Deadline that expired.
        timeout: Duration,
    },
    /// The server answered with a non-success status.
    #[error("request to {url} failed with HTTP status {status}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Connection, TLS, or body transfer failure.
    #[error("network error talking to {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },
    /// The body was not the expected JSON shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder error message.
        message: String,
    },
    /// The API replied with an error envelope.
    #[error("API error from {url}: {code}: {info}")]
    Api {
        /// Requested URL.
        url: String,
        /// Machine-readable error code.
        code: String,
        /// Human-readable explanation.
        info: String,
    },
}

impl FetchError {
    /// URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Http { url, .. }
            | Self::Network { url, .. }
            | Self::Decode { url, .. }
            | Self::Api { url, .. } => url,
        }
    }
}

/// Fetch pages of the article listing.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use geomarker_core::{Article, Cursor, FetchError, ListingPage, ListingSource, PageSize};
///
/// struct SinglePage;
///
/// #[async_trait]
/// impl ListingSource for SinglePage {
///     async fn fetch_page(
///         &self,
///         _cursor: &Cursor,
///         _page_size: PageSize,
///     ) -> Result<ListingPage, FetchError> {
///         Ok(ListingPage::new(vec![Article::new(1, "A")], ""))
///     }
/// }
/// ```
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the page that starts at `cursor`.
    ///
    /// An empty cursor requests the first page. The returned page's `next`
    /// cursor is empty when the listing is exhausted.
    async fn fetch_page(
        &self,
        cursor: &Cursor,
        page_size: PageSize,
    ) -> Result<ListingPage, FetchError>;
}

/// Resolve the position of a single article.
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    /// Look up coordinates for `article`.
    ///
    /// Absence of coordinates is [`Resolution::NotFound`], never an error.
    async fn resolve(&self, article: &Article) -> Result<Resolution, FetchError>;
}

#[async_trait]
impl<T> ListingSource for Arc<T>
where
    T: ListingSource + ?Sized,
{
    async fn fetch_page(
        &self,
        cursor: &Cursor,
        page_size: PageSize,
    ) -> Result<ListingPage, FetchError> {
        (**self).fetch_page(cursor, page_size).await
    }
}

#[async_trait]
impl<T> CoordinateResolver for Arc<T>
where
    T: CoordinateResolver + ?Sized,
{
    async fn resolve(&self, article: &Article) -> Result<Resolution, FetchError> {
        (**self).resolve(article).await
    }
}
