//! Error types emitted by the geomarker CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::error::Error as StdError;
use std::sync::Arc;

use geomarker_core::PageSizeError;
use geomarker_crawler::CrawlError;
use geomarker_data::mediawiki::ClientBuildError;
use geomarker_data::store::StoreError;
use thiserror::Error;

/// Exit status for a run stopped by Ctrl-C, following the shell convention
/// of 128 plus `SIGINT`.
pub const EXIT_CANCELLED: i32 = 130;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Errors emitted by the geomarker CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// Neither store was configured.
    #[error("no marker store configured (set --{sqlite} or --{db_host})")]
    MissingStore {
        /// Flag selecting the SQLite store.
        sqlite: &'static str,
        /// Flag selecting the PostGIS store.
        db_host: &'static str,
    },
    /// Both stores were configured.
    #[error("--{sqlite} and --{db_host} are mutually exclusive")]
    ConflictingStores {
        /// Flag selecting the SQLite store.
        sqlite: &'static str,
        /// Flag selecting the PostGIS store.
        db_host: &'static str,
    },
    /// A numeric option must be positive.
    #[error("{field} must be greater than zero")]
    ZeroValue {
        /// Flag name without the leading dashes.
        field: &'static str,
    },
    /// The configured page size is outside the API's range.
    #[error(transparent)]
    InvalidPageSize(#[from] PageSizeError),
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature that enables the action.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// The logger could not be installed.
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[source] Box<dyn StdError + Send + Sync + 'static>),
    /// The MediaWiki client could not be built.
    #[error(transparent)]
    BuildClient(#[from] ClientBuildError),
    /// Opening or preparing the marker store failed.
    #[error("failed to open {backend} marker store: {source}")]
    OpenStore {
        /// Backend name.
        backend: &'static str,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// The crawl stopped early.
    #[error("crawl failed: {0}")]
    Crawl(#[from] CrawlError),
}

impl CliError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Crawl(CrawlError::Cancelled) => EXIT_CANCELLED,
            _ => EXIT_FAILURE,
        }
    }
}
