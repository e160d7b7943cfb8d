//! Crawl command implementation for the geomarker CLI.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use geomarker_core::{MarkerStore, PageSize};
use geomarker_crawler::{CancellationToken, CrawlConfig, CrawlReport, Pipeline};
use geomarker_data::mediawiki::{MediaWikiClient, MediaWikiConfig};
use geomarker_data::store::{DEFAULT_PG_PORT, MarkerStoreBackend};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CRAWL_DB_HOST, ARG_CRAWL_DB_NAME, ARG_CRAWL_DB_USER, ARG_CRAWL_LISTING_TIMEOUT,
    ARG_CRAWL_LOOKUP_TIMEOUT, ARG_CRAWL_QUEUE_CAPACITY, ARG_CRAWL_SQLITE, ARG_CRAWL_WRITE_WORKERS,
    CliError, ENV_CRAWL_DB_NAME, ENV_CRAWL_DB_USER,
};

/// CLI arguments for the `crawl` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Walk every article in a MediaWiki listing, look up its \
                 coordinates, and upsert each located article as a marker \
                 into SQLite or PostGIS. Options can come from CLI flags, \
                 configuration files, or GEOMARKER_* environment variables.",
    about = "Crawl Wikipedia articles into a marker store"
)]
#[ortho_config(prefix = "GEOMARKER")]
pub(crate) struct CrawlArgs {
    /// MediaWiki action API endpoint.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// User agent sent with every request.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Articles requested per listing page (1-500).
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) page_size: Option<u32>,
    /// Deadline for one listing request, in seconds.
    #[arg(long = ARG_CRAWL_LISTING_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) listing_timeout_secs: Option<u64>,
    /// Deadline for one coordinate lookup, in seconds.
    #[arg(long = ARG_CRAWL_LOOKUP_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) lookup_timeout_secs: Option<u64>,
    /// Concurrent store writers.
    #[arg(long = ARG_CRAWL_WRITE_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) write_workers: Option<usize>,
    /// Markers that may queue for a writer before the walk waits.
    #[arg(long = ARG_CRAWL_QUEUE_CAPACITY, value_name = "count")]
    #[serde(default)]
    pub(crate) queue_capacity: Option<usize>,
    /// Write markers into this SQLite file.
    #[arg(long = ARG_CRAWL_SQLITE, value_name = "path")]
    #[serde(default)]
    pub(crate) sqlite: Option<Utf8PathBuf>,
    /// PostGIS host; selects the PostGIS store.
    #[arg(long = ARG_CRAWL_DB_HOST, value_name = "host")]
    #[serde(default)]
    pub(crate) db_host: Option<String>,
    /// PostGIS port.
    #[arg(long, value_name = "port")]
    #[serde(default)]
    pub(crate) db_port: Option<u16>,
    /// PostGIS login role.
    #[arg(long = ARG_CRAWL_DB_USER, value_name = "user")]
    #[serde(default)]
    pub(crate) db_user: Option<String>,
    /// PostGIS password.
    #[arg(long, value_name = "password")]
    #[serde(default)]
    pub(crate) db_password: Option<String>,
    /// PostGIS database name.
    #[arg(long = ARG_CRAWL_DB_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) db_name: Option<String>,
    /// Create the PostGIS extension and markers table before crawling.
    #[arg(long)]
    #[serde(default)]
    pub(crate) init_schema: bool,
}

impl CrawlArgs {
    pub(crate) fn into_config(self) -> Result<CrawlSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CrawlSettings::try_from(merged)
    }
}

/// PostGIS connection details as configured.
///
/// Kept separate from the store's own settings type so configuration
/// resolves the same way whether or not PostGIS support is compiled in.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct PostgresTarget {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) database: String,
    pub(crate) init_schema: bool,
}

impl fmt::Debug for PostgresTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("init_schema", &self.init_schema)
            .finish()
    }
}

/// Where markers are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreTarget {
    Sqlite(Utf8PathBuf),
    Postgres(PostgresTarget),
}

/// Resolved `crawl` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CrawlSettings {
    pub(crate) mediawiki: MediaWikiConfig,
    pub(crate) crawl: CrawlConfig,
    pub(crate) store: StoreTarget,
}

impl TryFrom<CrawlArgs> for CrawlSettings {
    type Error = CliError;

    fn try_from(args: CrawlArgs) -> Result<Self, Self::Error> {
        let store = resolve_store(&args)?;

        let mut mediawiki = MediaWikiConfig::default();
        if let Some(endpoint) = args.endpoint {
            mediawiki.endpoint = endpoint;
        }
        if let Some(user_agent) = args.user_agent {
            mediawiki.user_agent = user_agent;
        }
        if let Some(secs) = args.listing_timeout_secs {
            mediawiki.listing_timeout = positive_secs(secs, ARG_CRAWL_LISTING_TIMEOUT)?;
        }
        if let Some(secs) = args.lookup_timeout_secs {
            mediawiki.lookup_timeout = positive_secs(secs, ARG_CRAWL_LOOKUP_TIMEOUT)?;
        }

        let mut crawl = CrawlConfig::default();
        if let Some(size) = args.page_size {
            crawl = crawl.with_page_size(PageSize::new(size)?);
        }
        if let Some(workers) = args.write_workers {
            crawl = crawl.with_write_workers(non_zero(workers, ARG_CRAWL_WRITE_WORKERS)?);
        }
        if let Some(capacity) = args.queue_capacity {
            crawl = crawl.with_queue_capacity(non_zero(capacity, ARG_CRAWL_QUEUE_CAPACITY)?);
        }

        Ok(Self {
            mediawiki,
            crawl,
            store,
        })
    }
}

fn resolve_store(args: &CrawlArgs) -> Result<StoreTarget, CliError> {
    match (&args.sqlite, &args.db_host) {
        (Some(_), Some(_)) => Err(CliError::ConflictingStores {
            sqlite: ARG_CRAWL_SQLITE,
            db_host: ARG_CRAWL_DB_HOST,
        }),
        (Some(path), None) => Ok(StoreTarget::Sqlite(path.clone())),
        (None, Some(host)) => {
            let user = args.db_user.clone().ok_or(CliError::MissingArgument {
                field: ARG_CRAWL_DB_USER,
                env: ENV_CRAWL_DB_USER,
            })?;
            let database = args.db_name.clone().ok_or(CliError::MissingArgument {
                field: ARG_CRAWL_DB_NAME,
                env: ENV_CRAWL_DB_NAME,
            })?;
            Ok(StoreTarget::Postgres(PostgresTarget {
                host: host.clone(),
                port: args.db_port.unwrap_or(DEFAULT_PG_PORT),
                user,
                password: args.db_password.clone().unwrap_or_default(),
                database,
                init_schema: args.init_schema,
            }))
        }
        (None, None) => Err(CliError::MissingStore {
            sqlite: ARG_CRAWL_SQLITE,
            db_host: ARG_CRAWL_DB_HOST,
        }),
    }
}

fn positive_secs(secs: u64, field: &'static str) -> Result<Duration, CliError> {
    if secs == 0 {
        return Err(CliError::ZeroValue { field });
    }
    Ok(Duration::from_secs(secs))
}

fn non_zero(value: usize, field: &'static str) -> Result<NonZeroUsize, CliError> {
    NonZeroUsize::new(value).ok_or(CliError::ZeroValue { field })
}

/// Open the configured store, ensuring its schema where that applies.
pub(crate) async fn open_store(
    target: &StoreTarget,
    write_workers: NonZeroUsize,
) -> Result<MarkerStoreBackend, CliError> {
    match target {
        StoreTarget::Sqlite(path) => open_sqlite(path),
        StoreTarget::Postgres(postgres) => open_postgres(postgres, write_workers).await,
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(path: &Utf8PathBuf) -> Result<MarkerStoreBackend, CliError> {
    let store = geomarker_data::store::SqliteMarkerStore::open(path.as_std_path()).map_err(
        |source| CliError::OpenStore {
            backend: "sqlite",
            source,
        },
    )?;
    Ok(store.into())
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_path: &Utf8PathBuf) -> Result<MarkerStoreBackend, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "writing markers to SQLite",
    })
}

#[cfg(feature = "store-postgres")]
async fn open_postgres(
    target: &PostgresTarget,
    write_workers: NonZeroUsize,
) -> Result<MarkerStoreBackend, CliError> {
    use geomarker_data::store::{PgMarkerStore, PgSettings};

    let open_error = |source| CliError::OpenStore {
        backend: "postgres",
        source,
    };
    let settings = PgSettings {
        host: target.host.clone(),
        port: target.port,
        user: target.user.clone(),
        password: target.password.clone(),
        database: target.database.clone(),
    };
    let max_connections = u32::try_from(write_workers.get()).unwrap_or(u32::MAX);
    let store = PgMarkerStore::connect(&settings, max_connections)
        .await
        .map_err(open_error)?;
    if target.init_schema {
        store.initialise_schema().await.map_err(open_error)?;
    }
    Ok(store.into())
}

#[cfg(not(feature = "store-postgres"))]
async fn open_postgres(
    _target: &PostgresTarget,
    _write_workers: NonZeroUsize,
) -> Result<MarkerStoreBackend, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-postgres",
        action: "writing markers to PostGIS",
    })
}

pub(crate) async fn run_crawl(
    args: CrawlArgs,
    cancel: CancellationToken,
) -> Result<CrawlReport, CliError> {
    let settings = args.into_config()?;
    let store = Arc::new(open_store(&settings.store, settings.crawl.write_workers).await?);
    log::info!(
        "crawling {} into {} store",
        settings.mediawiki.endpoint,
        store.name()
    );
    let outcome = execute_crawl(&settings, Arc::clone(&store), cancel).await;
    store.close().await;
    outcome
}

/// Run one crawl against an already opened store.
pub(crate) async fn execute_crawl<S>(
    settings: &CrawlSettings,
    store: S,
    cancel: CancellationToken,
) -> Result<CrawlReport, CliError>
where
    S: MarkerStore + 'static,
{
    let client = MediaWikiClient::with_config(settings.mediawiki.clone())?;
    let pipeline = Pipeline::with_config(client.clone(), client, store, settings.crawl);
    Ok(pipeline.run(cancel).await?)
}
