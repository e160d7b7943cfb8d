//! Pagination primitives for the article listing.

use std::fmt;

use thiserror::Error;

use crate::Article;

/// Opaque continuation token returned by the listing endpoint.
///
/// The empty token plays two roles: the walk starts from it, and a page that
/// returns it signals that no further pages exist.
///
/// # Examples
/// ```
/// use geomarker_core::Cursor;
///
/// assert!(Cursor::start().is_empty());
/// let next = Cursor::from("Berlin");
/// assert!(!next.is_empty());
/// assert_eq!(next.as_str(), "Berlin");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// The cursor used for the first listing request.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }

    /// Wrap a token returned by the server.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Whether this is the empty token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the cursor, returning the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<start>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Number of articles requested per listing page (`aplimit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(u32);

impl PageSize {
    /// Largest page the API serves to anonymous clients.
    pub const MAX: u32 = 500;

    /// Validate a requested page size.
    ///
    /// # Examples
    /// ```
    /// use geomarker_core::PageSize;
    ///
    /// assert_eq!(PageSize::new(50).map(PageSize::get), Ok(50));
    /// assert!(PageSize::new(0).is_err());
    /// assert!(PageSize::new(501).is_err());
    /// ```
    pub fn new(requested: u32) -> Result<Self, PageSizeError> {
        if (1..=Self::MAX).contains(&requested) {
            Ok(Self(requested))
        } else {
            Err(PageSizeError {
                requested,
                max: Self::MAX,
            })
        }
    }

    /// The page size as sent on the wire.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Returned when a page size falls outside `1..=PageSize::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page size {requested} must be between 1 and {max}")]
pub struct PageSizeError {
    /// The rejected value.
    pub requested: u32,
    /// The largest accepted value.
    pub max: u32,
}

/// One decoded page of the article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Articles in server order.
    pub articles: Vec<Article>,
    /// Token for the following page; empty when the listing is exhausted.
    pub next: Cursor,
}

impl ListingPage {
    /// Construct a page from its articles and continuation token.
    pub fn new(articles: Vec<Article>, next: impl Into<Cursor>) -> Self {
        Self {
            articles,
            next: next.into(),
        }
    }

    /// Whether the walk should stop after this page.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_empty()
    }
}
