//! Crawl pipeline for Wikipedia geomarkers.
//!
//! The pipeline walks the article listing page by page, resolves each
//! article's coordinates one at a time, and hands every located article to a
//! bounded pool of writers. It is generic over the boundary traits in
//! `geomarker-core`, so the same code drives the MediaWiki client against a
//! real database and the scripted doubles in tests.
//!
//! - [`Walker`] follows the continuation cursor until it is empty.
//! - [`MarkerSink`] owns the write queue and its worker tasks.
//! - [`Pipeline`] wires the two together and always drains the sink.
//! - [`CrawlObserver`] receives progress and failure events; [`LogObserver`]
//!   forwards them to the `log` facade.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod observer;
mod pipeline;
mod report;
mod sink;
mod walk;

pub use config::{CrawlConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WRITE_WORKERS};
pub use error::CrawlError;
pub use observer::{CrawlObserver, LogObserver};
pub use pipeline::Pipeline;
pub use report::{CrawlReport, SinkSummary, WalkSummary};
pub use sink::MarkerSink;
pub use tokio_util::sync::CancellationToken;
pub use walk::Walker;
