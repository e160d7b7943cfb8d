//! Write access to persisted markers.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Marker;

/// Idempotent, concurrent-safe marker persistence.
///
/// Implementations key rows by [`Marker::page_id`]. Writing the same id twice
/// leaves a single row holding the latest values. Several workers share one
/// store through an `Arc`, so `upsert` must tolerate concurrent calls.
#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Backend-specific write failure.
    type Error: StdError + Send + Sync + 'static;

    /// Insert `marker`, or update the existing row with the same page id.
    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T> MarkerStore for Arc<T>
where
    T: MarkerStore + ?Sized,
{
    type Error = T::Error;

    async fn upsert(&self, marker: &Marker) -> Result<(), Self::Error> {
        (**self).upsert(marker).await
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerStore;
    use crate::test_support::MemoryMarkerStore;
    use crate::{Article, Coordinates, Marker};
    use rstest::rstest;

    fn marker_at(lat: f64, lon: f64) -> Marker {
        Marker::from_article(
            Article::new(42, "Answer"),
            Coordinates::new(lat, lon).expect("valid coordinates"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_keeps_latest_values() {
        let store = MemoryMarkerStore::default();
        store
            .upsert(&marker_at(1.0, 1.0))
            .await
            .expect("first write succeeds");
        store
            .upsert(&marker_at(2.0, 3.0))
            .await
            .expect("second write succeeds");

        let rows = store.markers();
        assert_eq!(rows.len(), 1, "one row per page id");
        assert_eq!(rows[0].latitude(), 2.0);
        assert_eq!(rows[0].longitude(), 3.0);
        assert_eq!(store.upsert_count(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failing_ids_are_not_stored() {
        let store = MemoryMarkerStore::failing_for([42]);
        let err = store
            .upsert(&marker_at(1.0, 1.0))
            .await
            .expect_err("configured to fail");
        assert_eq!(err.page_id, 42);
        assert!(store.markers().is_empty());
    }
}
