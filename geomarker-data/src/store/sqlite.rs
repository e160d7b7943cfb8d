//! SQLite marker store.
//!
//! One connection is shared behind a mutex and every call runs on Tokio's
//! blocking pool, so concurrent writers are serialised without stalling the
//! async workers that submit them.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use geomarker_core::{Marker, MarkerStore};
use rusqlite::{Connection, OptionalExtension};

use super::schema::initialise_schema;
use super::{StoreError, page_key};

/// Upsert statement; every value is a bound parameter.
pub const SQLITE_UPSERT_SQL: &str = "INSERT INTO markers (pageid, title, lat, lon, source, geom)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(pageid) DO UPDATE SET
        title = excluded.title,
        lat = excluded.lat,
        lon = excluded.lon,
        source = excluded.source,
        geom = excluded.geom";

/// A row read back from the `markers` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMarker {
    /// Page id key.
    pub page_id: u64,
    /// Stored title.
    pub title: String,
    /// Latitude column.
    pub lat: f64,
    /// Longitude column.
    pub lon: f64,
    /// Provenance tag.
    pub source: String,
    /// EWKT geometry.
    pub geom: String,
}

/// Marker store backed by a single SQLite connection.
///
/// # Examples
/// ```
/// use geomarker_core::{Article, Coordinates, Marker, MarkerStore};
/// use geomarker_data::store::SqliteMarkerStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteMarkerStore::open_in_memory()?;
/// let marker = Marker::from_article(Article::new(7, "London"), Coordinates::new(51.5, -0.12)?);
/// store.upsert(&marker).await?;
///
/// let row = store.load(7).await?.expect("row stored");
/// assert_eq!(row.geom, "SRID=4326;POINT(-0.12 51.5)");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteMarkerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteMarkerStore {
    /// Open (or create) the database at `path` and ensure the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the file cannot be opened and
    /// [`StoreError::Schema`] when the schema step fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let connection = Connection::open(path).map_err(|source| StoreError::Sqlite {
            operation: "open database",
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// See [`SqliteMarkerStore::open`].
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Sqlite {
            operation: "open in-memory database",
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection after ensuring the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Schema`] when the schema step fails.
    pub fn from_connection(mut connection: Connection) -> Result<Self, StoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Read the row stored for `page_id`.
    ///
    /// # Errors
    ///
    /// Propagates SQLite and task failures.
    pub async fn load(&self, page_id: u64) -> Result<Option<StoredMarker>, StoreError> {
        let key = page_key(page_id)?;
        self.with_connection(move |connection| {
            connection
                .query_row(
                    "SELECT title, lat, lon, source, geom FROM markers WHERE pageid = ?1",
                    [key],
                    |row| {
                        Ok(StoredMarker {
                            page_id,
                            title: row.get(0)?,
                            lat: row.get(1)?,
                            lon: row.get(2)?,
                            source: row.get(3)?,
                            geom: row.get(4)?,
                        })
                    },
                )
                .optional()
                .map_err(|source| StoreError::Sqlite {
                    operation: "load marker",
                    source,
                })
        })
        .await
    }

    /// Number of stored markers.
    ///
    /// # Errors
    ///
    /// Propagates SQLite and task failures.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row("SELECT COUNT(*) FROM markers", [], |row| row.get(0))
                .map_err(|source| StoreError::Sqlite {
                    operation: "count markers",
                    source,
                })
        })
        .await
    }

    /// Run `operation` against the shared connection on the blocking pool.
    async fn with_connection<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|_| StoreError::Poisoned)?;
            operation(&mut guard)
        })
        .await
        .map_err(StoreError::Join)?
    }
}

fn upsert_marker(connection: &Connection, marker: &Marker) -> Result<(), StoreError> {
    let key = page_key(marker.page_id)?;
    let mut statement =
        connection
            .prepare_cached(SQLITE_UPSERT_SQL)
            .map_err(|source| StoreError::Sqlite {
                operation: "prepare upsert marker",
                source,
            })?;
    statement
        .execute((
            key,
            marker.title.as_str(),
            marker.latitude(),
            marker.longitude(),
            marker.source,
            marker.ewkt(),
        ))
        .map(|_| ())
        .map_err(|source| StoreError::Sqlite {
            operation: "upsert marker",
            source,
        })
}

#[async_trait]
impl MarkerStore for SqliteMarkerStore {
    type Error = StoreError;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        let marker = marker.clone();
        self.with_connection(move |connection| upsert_marker(connection, &marker))
            .await
    }
}
