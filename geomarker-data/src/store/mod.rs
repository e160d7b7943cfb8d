//! Marker persistence backends.
//!
//! - [`SqliteMarkerStore`] writes into a local SQLite file (`store-sqlite`).
//! - [`PgMarkerStore`] writes into PostGIS through a sqlx pool
//!   (`store-postgres`).
//! - [`MarkerStoreBackend`] picks one of the two at runtime.
//!
//! Both backends key rows by page id and upsert with a single parameterised
//! statement, so repeated writes for the same article converge on the latest
//! values.
#![forbid(unsafe_code)]

mod error;

#[cfg(any(feature = "store-sqlite", feature = "store-postgres"))]
mod backend;
#[cfg(feature = "store-postgres")]
mod postgres;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(any(feature = "store-sqlite", feature = "store-postgres"))]
pub use backend::MarkerStoreBackend;
pub use error::StoreError;
#[cfg(feature = "store-postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-postgres")))]
pub use postgres::{PG_UPSERT_SQL, PgMarkerStore, PgSettings};
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
pub use sqlite::{SQLITE_UPSERT_SQL, SqliteMarkerStore, StoredMarker};

/// Default PostgreSQL port. Not feature-gated.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Convert a page id into the signed key both databases use.
#[cfg(any(feature = "store-sqlite", feature = "store-postgres"))]
fn page_key(page_id: u64) -> Result<i64, StoreError> {
    i64::try_from(page_id).map_err(|_| StoreError::PageIdOutOfRange { page_id })
}
