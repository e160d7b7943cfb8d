//! MediaWiki action API client.
//!
//! [`MediaWikiClient`] implements both [`geomarker_core::ListingSource`]
//! (`list=allpages`) and [`geomarker_core::CoordinateResolver`]
//! (`prop=coordinates`). Listing and lookup requests carry independent
//! deadlines.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geomarker_core::{Article, CoordinateResolver, Resolution};
//! use geomarker_data::mediawiki::{MediaWikiClient, MediaWikiConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MediaWikiConfig::default()
//!     .with_lookup_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-crawler/1.0 (ops@example.com)");
//! let client = MediaWikiClient::with_config(config)?;
//! if let Resolution::Found(position) = client.resolve(&Article::new(17867, "London")).await? {
//!     println!("{}, {}", position.latitude(), position.longitude());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod response;

pub use client::{ClientBuildError, MediaWikiClient};
pub use config::{
    DEFAULT_ENDPOINT, DEFAULT_LISTING_TIMEOUT, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_USER_AGENT,
    MediaWikiConfig,
};
