//! Adapters between the geomarker domain and the outside world.
//!
//! Responsibilities:
//! - Talk to the MediaWiki action API for listings and coordinate lookups.
//! - Persist markers into SQLite or PostGIS.
//!
//! Boundaries:
//! - Domain types and traits live in `geomarker-core`.
//! - Sequencing the crawl lives in `geomarker-crawler`.
//!
//! Invariants:
//! - Every adapter is `Send + Sync` and safe to share through an `Arc`.
//! - Blocking database calls never run on an async worker thread.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod mediawiki;
pub mod store;
