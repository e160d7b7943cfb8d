//! PostGIS marker store on a sqlx connection pool.

use std::fmt;

use async_trait::async_trait;
use geomarker_core::{Marker, MarkerStore};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use super::{StoreError, page_key};

/// Upsert statement. The geometry is built by the database from the same
/// bound latitude and longitude that fill the scalar columns.
pub const PG_UPSERT_SQL: &str = "INSERT INTO markers (pageid, title, lat, lon, source, geom)
    VALUES ($1, $2, $3, $4, $5, ST_SetSRID(ST_MakePoint($4, $3), 4326))
    ON CONFLICT (pageid) DO UPDATE SET
        title = EXCLUDED.title,
        lat = EXCLUDED.lat,
        lon = EXCLUDED.lon,
        source = EXCLUDED.source,
        geom = EXCLUDED.geom";

const CREATE_POSTGIS_SQL: &str = "CREATE EXTENSION IF NOT EXISTS postgis";

const CREATE_MARKERS_SQL: &str = "CREATE TABLE IF NOT EXISTS markers (
    pageid BIGINT PRIMARY KEY,
    title TEXT NOT NULL,
    lat DOUBLE PRECISION NOT NULL,
    lon DOUBLE PRECISION NOT NULL,
    source TEXT NOT NULL,
    geom geometry(Point, 4326) NOT NULL
)";

/// Connection settings for the PostGIS database.
#[derive(Clone, PartialEq, Eq)]
pub struct PgSettings {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl PgSettings {
    /// Build sqlx connect options from the settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl fmt::Debug for PgSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Marker store writing into a PostGIS `markers` table.
#[derive(Debug, Clone)]
pub struct PgMarkerStore {
    pool: PgPool,
}

impl PgMarkerStore {
    /// Open a pool holding at most `max_connections` connections.
    ///
    /// Size the pool to the number of write workers so every worker can hold
    /// a connection without queueing inside sqlx.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Postgres`] when the first connection fails.
    pub async fn connect(settings: &PgSettings, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(settings.connect_options())
            .await
            .map_err(|source| StoreError::Postgres {
                operation: "connect",
                source,
            })?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the PostGIS extension and the `markers` table when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Postgres`] naming the failing statement.
    pub async fn initialise_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_POSTGIS_SQL)
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Postgres {
                operation: "create postgis extension",
                source,
            })?;
        sqlx::query(CREATE_MARKERS_SQL)
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Postgres {
                operation: "create markers",
                source,
            })?;
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl MarkerStore for PgMarkerStore {
    type Error = StoreError;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        let key = page_key(marker.page_id)?;
        sqlx::query(PG_UPSERT_SQL)
            .bind(key)
            .bind(marker.title.as_str())
            .bind(marker.latitude())
            .bind(marker.longitude())
            .bind(marker.source)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|source| StoreError::Postgres {
                operation: "upsert marker",
                source,
            })
    }
}
