//! In-memory doubles for the boundary traits, used by unit and behaviour
//! tests across the workspace.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    Article, CoordinateResolver, Coordinates, Cursor, FetchError, ListingPage, ListingSource,
    Marker, MarkerStore, PageSize, Resolution,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Listing source that replays scripted pages keyed by cursor.
///
/// Every request is recorded, so tests can assert the exact cursor sequence.
/// A cursor with no script entry yields [`FetchError::Http`] with status 404.
#[derive(Debug, Default)]
pub struct ScriptedListing {
    pages: HashMap<Cursor, Result<ListingPage, FetchError>>,
    requests: Mutex<Vec<(Cursor, PageSize)>>,
}

impl ScriptedListing {
    /// Script a successful page for `cursor`.
    #[must_use]
    pub fn with_page(mut self, cursor: impl Into<Cursor>, page: ListingPage) -> Self {
        self.pages.insert(cursor.into(), Ok(page));
        self
    }

    /// Script a failure for `cursor`.
    #[must_use]
    pub fn with_error(mut self, cursor: impl Into<Cursor>, error: FetchError) -> Self {
        self.pages.insert(cursor.into(), Err(error));
        self
    }

    /// Cursors requested so far, in order.
    pub fn requested_cursors(&self) -> Vec<Cursor> {
        lock(&self.requests)
            .iter()
            .map(|(cursor, _)| cursor.clone())
            .collect()
    }

    /// Page sizes requested so far, in order.
    pub fn requested_page_sizes(&self) -> Vec<PageSize> {
        lock(&self.requests).iter().map(|(_, size)| *size).collect()
    }
}

#[async_trait]
impl ListingSource for ScriptedListing {
    async fn fetch_page(
        &self,
        cursor: &Cursor,
        page_size: PageSize,
    ) -> Result<ListingPage, FetchError> {
        lock(&self.requests).push((cursor.clone(), page_size));
        self.pages
            .get(cursor)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Http {
                    url: format!("scripted://listing?apfrom={}", cursor.as_str()),
                    status: 404,
                })
            })
    }
}

/// Resolver that answers from a table keyed by page id.
///
/// Unknown ids resolve to [`Resolution::NotFound`].
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    answers: HashMap<u64, Result<Resolution, FetchError>>,
    requests: Mutex<Vec<u64>>,
}

impl ScriptedResolver {
    /// Resolve `page_id` to the given position.
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are invalid; test scripts are expected to
    /// use valid positions.
    #[must_use]
    pub fn with_coordinates(mut self, page_id: u64, latitude: f64, longitude: f64) -> Self {
        let coordinates = Coordinates::new(latitude, longitude)
            .unwrap_or_else(|err| panic!("scripted coordinates must be valid: {err}"));
        self.answers
            .insert(page_id, Ok(Resolution::Found(coordinates)));
        self
    }

    /// Fail the lookup for `page_id`.
    #[must_use]
    pub fn with_error(mut self, page_id: u64, error: FetchError) -> Self {
        self.answers.insert(page_id, Err(error));
        self
    }

    /// Page ids looked up so far, in order.
    pub fn requested_ids(&self) -> Vec<u64> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl CoordinateResolver for ScriptedResolver {
    async fn resolve(&self, article: &Article) -> Result<Resolution, FetchError> {
        lock(&self.requests).push(article.page_id);
        self.answers
            .get(&article.page_id)
            .cloned()
            .unwrap_or(Ok(Resolution::NotFound))
    }
}

/// Error raised by [`MemoryMarkerStore`] for ids configured to fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scripted write failure for page {page_id}")]
pub struct MemoryStoreError {
    /// Page id whose write was rejected.
    pub page_id: u64,
}

/// Marker store backed by a `BTreeMap`, keyed by page id.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    rows: Mutex<BTreeMap<u64, Marker>>,
    failing: HashSet<u64>,
    upserts: AtomicUsize,
}

impl MemoryMarkerStore {
    /// Create a store that rejects writes for the given page ids.
    pub fn failing_for<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        Self {
            failing: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Stored markers ordered by page id.
    pub fn markers(&self) -> Vec<Marker> {
        lock(&self.rows).values().cloned().collect()
    }

    /// Stored marker for `page_id`, if any.
    pub fn get(&self, page_id: u64) -> Option<Marker> {
        lock(&self.rows).get(&page_id).cloned()
    }

    /// Number of upsert calls, successful or not.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarkerStore for MemoryMarkerStore {
    type Error = MemoryStoreError;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&marker.page_id) {
            return Err(MemoryStoreError {
                page_id: marker.page_id,
            });
        }
        lock(&self.rows).insert(marker.page_id, marker.clone());
        Ok(())
    }
}
