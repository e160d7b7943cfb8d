use async_trait::async_trait;
use geomarker_core::{Marker, MarkerStore};

#[cfg(feature = "store-postgres")]
use super::PgMarkerStore;
#[cfg(feature = "store-sqlite")]
use super::SqliteMarkerStore;
use super::StoreError;

/// Runtime choice between the compiled-in store backends.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum MarkerStoreBackend {
    /// Local SQLite file.
    #[cfg(feature = "store-sqlite")]
    Sqlite(SqliteMarkerStore),
    /// PostGIS database.
    #[cfg(feature = "store-postgres")]
    Postgres(PgMarkerStore),
}

impl MarkerStoreBackend {
    /// Short backend name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "store-sqlite")]
            Self::Sqlite(_) => "sqlite",
            #[cfg(feature = "store-postgres")]
            Self::Postgres(_) => "postgres",
        }
    }

    /// Release pooled connections.
    ///
    /// SQLite closes its connection on drop, so only PostGIS has work to do.
    pub async fn close(&self) {
        #[cfg(feature = "store-postgres")]
        if let Self::Postgres(store) = self {
            store.close().await;
        }
    }
}

#[cfg(feature = "store-sqlite")]
impl From<SqliteMarkerStore> for MarkerStoreBackend {
    fn from(store: SqliteMarkerStore) -> Self {
        Self::Sqlite(store)
    }
}

#[cfg(feature = "store-postgres")]
impl From<PgMarkerStore> for MarkerStoreBackend {
    fn from(store: PgMarkerStore) -> Self {
        Self::Postgres(store)
    }
}

#[async_trait]
impl MarkerStore for MarkerStoreBackend {
    type Error = StoreError;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        match self {
            #[cfg(feature = "store-sqlite")]
            Self::Sqlite(store) => store.upsert(marker).await,
            #[cfg(feature = "store-postgres")]
            Self::Postgres(store) => store.upsert(marker).await,
        }
    }
}
