//! Shared doubles for crawler tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::error::Error as StdError;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use geomarker_core::test_support::{MemoryMarkerStore, MemoryStoreError};
use geomarker_core::{Article, Cursor, FetchError, Marker, MarkerStore};
use geomarker_crawler::{CrawlError, CrawlObserver, CrawlReport, SinkSummary};
use tokio::sync::Semaphore;
use tokio::task::JoinError;

/// One observed crawl event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PageFetched { cursor: String, articles: usize },
    CoordinatesMissing { page_id: u64 },
    ResolutionFailed { page_id: u64 },
    WriteFailed { page_id: u64 },
    WritesAbandoned { count: u64 },
    WorkerFailed,
    Finished,
    Aborted,
}

/// Observer that records events in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl CrawlObserver for RecordingObserver {
    fn page_fetched(&self, cursor: &Cursor, articles: usize) {
        self.push(Event::PageFetched {
            cursor: cursor.as_str().to_owned(),
            articles,
        });
    }

    fn coordinates_missing(&self, article: &Article) {
        self.push(Event::CoordinatesMissing {
            page_id: article.page_id,
        });
    }

    fn resolution_failed(&self, article: &Article, _error: &FetchError) {
        self.push(Event::ResolutionFailed {
            page_id: article.page_id,
        });
    }

    fn write_failed(&self, page_id: u64, _error: &(dyn StdError + 'static)) {
        self.push(Event::WriteFailed { page_id });
    }

    fn writes_abandoned(&self, count: u64) {
        self.push(Event::WritesAbandoned { count });
    }

    fn worker_failed(&self, _error: &JoinError) {
        self.push(Event::WorkerFailed);
    }

    fn crawl_finished(&self, _report: &CrawlReport) {
        self.push(Event::Finished);
    }

    fn crawl_aborted(&self, _error: &CrawlError, _sink: &SinkSummary) {
        self.push(Event::Aborted);
    }
}

/// Store whose writes block until the test opens the gate.
///
/// Each write announces itself on `entered` before waiting for a permit on
/// `gate`, so tests can tell when a worker is busy.
#[derive(Debug)]
pub struct GatedStore {
    inner: MemoryMarkerStore,
    entered: Semaphore,
    gate: Semaphore,
}

impl GatedStore {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryMarkerStore::default(),
            entered: Semaphore::new(0),
            gate: Semaphore::new(0),
        })
    }

    /// Wait until `writes` writes have started.
    pub async fn wait_for_writes(&self, writes: u32) {
        self.entered
            .acquire_many(writes)
            .await
            .expect("entry semaphore is never closed")
            .forget();
    }

    /// Let up to `writes` blocked or future writes complete.
    pub fn release(&self, writes: usize) {
        self.gate.add_permits(writes);
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.inner.markers()
    }
}

#[async_trait]
impl MarkerStore for GatedStore {
    type Error = MemoryStoreError;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        self.entered.add_permits(1);
        self.gate
            .acquire()
            .await
            .expect("gate semaphore is never closed")
            .forget();
        self.inner.upsert(marker).await
    }
}

/// Build a marker for `page_id` at a fixed position.
pub fn marker(page_id: u64) -> Marker {
    Marker::from_article(
        Article::new(page_id, format!("Page {page_id}")),
        geomarker_core::Coordinates::new(10.0, 20.0).expect("valid coordinates"),
    )
}

/// Run `future` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("build test runtime")
        .block_on(future)
}
