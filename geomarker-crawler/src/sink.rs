//! Bounded pool of marker writers.
//!
//! Markers travel through a bounded channel shared by a fixed number of
//! worker tasks. [`MarkerSink::submit`] waits for queue space, which throttles
//! the walk whenever the store falls behind. Write failures are reported to
//! the observer and counted; they never reach the submitter. A store that
//! panics mid-write counts as a failed write and the worker keeps going.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use geomarker_core::{Marker, MarkerStore};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{CrawlConfig, CrawlError, CrawlObserver, SinkSummary};

#[derive(Debug, Default)]
struct SinkCounters {
    written: AtomicU64,
    failed: AtomicU64,
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<Marker>>>;

/// A store panicked inside `upsert`; reported as a failed write.
#[derive(Debug, Error)]
#[error("store panicked while writing page {page_id}")]
struct WritePanicked {
    page_id: u64,
}

/// Fixed-size write pool fed by a bounded queue.
///
/// Call [`MarkerSink::finish`] to close the queue and wait for the workers.
/// Dropping the sink without finishing detaches the workers.
pub struct MarkerSink {
    sender: mpsc::Sender<Marker>,
    queue: SharedQueue,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<SinkCounters>,
    observer: Arc<dyn CrawlObserver>,
    cancel: CancellationToken,
}

impl MarkerSink {
    /// Spawn `config.write_workers` writers on the current Tokio runtime.
    ///
    /// Once `cancel` fires, workers finish the write in hand and stop taking
    /// queued markers.
    pub fn start<S>(
        store: Arc<S>,
        config: &CrawlConfig,
        observer: Arc<dyn CrawlObserver>,
        cancel: CancellationToken,
    ) -> Self
    where
        S: MarkerStore + ?Sized + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.get());
        let queue: SharedQueue = Arc::new(Mutex::new(receiver));
        let counters = Arc::new(SinkCounters::default());
        let workers = (0..config.write_workers.get())
            .map(|_| {
                tokio::spawn(run_worker(
                    Arc::clone(&store),
                    Arc::clone(&queue),
                    Arc::clone(&counters),
                    Arc::clone(&observer),
                    cancel.clone(),
                ))
            })
            .collect();

        Self {
            sender,
            queue,
            workers,
            counters,
            observer,
            cancel,
        }
    }

    /// Queue `marker` for writing, waiting while the queue is full.
    ///
    /// Returns once the marker is queued; the write itself happens later.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Cancelled`] when the run is cancelled before the
    /// marker could be queued.
    pub async fn submit(&self, marker: Marker) -> Result<(), CrawlError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CrawlError::Cancelled),
            sent = self.sender.send(marker) => sent.map_err(|_| CrawlError::Cancelled),
        }
    }

    /// Close the queue, wait for every worker, and report the totals.
    ///
    /// Without cancellation the workers drain the queue before exiting.
    /// After cancellation anything still queued is counted as abandoned.
    pub async fn finish(self) -> SinkSummary {
        let Self {
            sender,
            queue,
            workers,
            counters,
            observer,
            cancel: _,
        } = self;
        drop(sender);

        let mut failed_workers = 0;
        for worker in workers {
            if let Err(error) = worker.await {
                observer.worker_failed(&error);
                failed_workers += 1;
            }
        }

        let mut abandoned = 0;
        {
            let mut receiver = queue.lock().await;
            while receiver.try_recv().is_ok() {
                abandoned += 1;
            }
        }
        if abandoned > 0 {
            observer.writes_abandoned(abandoned);
        }

        SinkSummary {
            written: counters.written.load(Ordering::SeqCst),
            failed: counters.failed.load(Ordering::SeqCst),
            abandoned,
            failed_workers,
        }
    }
}

async fn run_worker<S>(
    store: Arc<S>,
    queue: SharedQueue,
    counters: Arc<SinkCounters>,
    observer: Arc<dyn CrawlObserver>,
    cancel: CancellationToken,
) where
    S: MarkerStore + ?Sized,
{
    loop {
        let next = {
            let mut receiver = queue.lock().await;
            tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                marker = receiver.recv() => marker,
            }
        };
        let Some(marker) = next else {
            break;
        };
        // A panicking store must not take the worker down with it, or the
        // queue stops draining and `submit` waits forever.
        let outcome = AssertUnwindSafe(store.upsert(&marker)).catch_unwind().await;
        match outcome {
            Ok(Ok(())) => {
                counters.written.fetch_add(1, Ordering::SeqCst);
            }
            Ok(Err(error)) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                observer.write_failed(marker.page_id, &error);
            }
            Err(_panic) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                let error = WritePanicked {
                    page_id: marker.page_id,
                };
                observer.write_failed(marker.page_id, &error);
            }
        }
    }
}

