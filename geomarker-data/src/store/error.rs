use thiserror::Error;

#[cfg(feature = "store-sqlite")]
use super::schema::SchemaError;

/// Errors raised by marker stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A SQLite statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("SQLite operation '{operation}' failed")]
    Sqlite {
        /// Short name of the failing step.
        operation: &'static str,
        /// Driver error.
        #[source]
        source: rusqlite::Error,
    },
    /// A PostgreSQL statement or connection failed.
    #[cfg(feature = "store-postgres")]
    #[error("PostgreSQL operation '{operation}' failed")]
    Postgres {
        /// Short name of the failing step.
        operation: &'static str,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },
    /// The page id does not fit a signed 64-bit key.
    #[error("page id {page_id} exceeds SQL INTEGER range")]
    PageIdOutOfRange {
        /// Rejected page id.
        page_id: u64,
    },
    /// A writer panicked while holding the connection lock.
    #[error("store connection lock was poisoned by a panicking writer")]
    Poisoned,
    /// The blocking task running the statement did not complete.
    #[error("blocking store task failed")]
    Join(#[source] tokio::task::JoinError),
    /// Schema setup or version check failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
