//! Tests running the crawl command against local stores.

use super::*;
use crate::crawl::{CrawlSettings, PostgresTarget, StoreTarget, execute_crawl, open_store};
use camino::Utf8PathBuf;
use geomarker_core::test_support::MemoryMarkerStore;
use geomarker_core::{Cursor, FetchError};
use geomarker_crawler::CrawlError;
use rstest::rstest;
use std::net::TcpListener;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tempfile::TempDir;

fn settings_for(endpoint: &str) -> CrawlSettings {
    CrawlSettings::try_from(CrawlArgs {
        endpoint: Some(endpoint.to_owned()),
        sqlite: Some(Utf8PathBuf::from("unused.db")),
        listing_timeout_secs: Some(2),
        ..CrawlArgs::default()
    })
    .expect("settings resolve")
}

/// An endpoint on a port nothing listens on.
fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/w/api.php")
}

#[rstest]
#[tokio::test]
async fn cancelled_crawl_exits_with_interrupt_status() {
    let store = Arc::new(MemoryMarkerStore::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = execute_crawl(&settings_for(&closed_endpoint()), Arc::clone(&store), cancel)
        .await
        .expect_err("cancelled before the first page");

    assert!(matches!(err, CliError::Crawl(CrawlError::Cancelled)));
    assert_eq!(err.exit_code(), EXIT_CANCELLED);
    assert_eq!(store.upsert_count(), 0);
}

#[rstest]
#[tokio::test]
async fn unreachable_endpoint_fails_the_first_page() {
    let store = Arc::new(MemoryMarkerStore::default());

    let err = execute_crawl(
        &settings_for(&closed_endpoint()),
        Arc::clone(&store),
        CancellationToken::new(),
    )
    .await
    .expect_err("listing cannot be fetched");

    match &err {
        CliError::Crawl(CrawlError::Listing { cursor, source }) => {
            assert_eq!(cursor, &Cursor::start());
            assert!(matches!(
                source,
                FetchError::Network { .. } | FetchError::Timeout { .. }
            ));
        }
        other => panic!("expected listing failure, found {other:?}"),
    }
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert!(store.markers().is_empty());
}

#[rstest]
#[tokio::test]
async fn invalid_endpoint_is_reported_before_crawling() {
    let err = execute_crawl(
        &settings_for("not a url"),
        MemoryMarkerStore::default(),
        CancellationToken::new(),
    )
    .await
    .expect_err("endpoint rejected");
    assert!(matches!(err, CliError::BuildClient(_)));
}

#[cfg(feature = "store-sqlite")]
#[rstest]
#[tokio::test]
async fn sqlite_target_opens_a_fresh_database() {
    let dir = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("markers.db")).expect("utf-8 path");

    let store = open_store(&StoreTarget::Sqlite(path.clone()), NonZeroUsize::MIN)
        .await
        .expect("store opens");

    assert_eq!(store.name(), "sqlite");
    assert!(path.is_file());
}

#[cfg(feature = "store-sqlite")]
#[rstest]
#[tokio::test]
async fn sqlite_target_in_missing_directory_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent").join("markers.db"))
        .expect("utf-8 path");

    let err = open_store(&StoreTarget::Sqlite(path), NonZeroUsize::MIN)
        .await
        .expect_err("directory does not exist");
    assert!(matches!(err, CliError::OpenStore { backend: "sqlite", .. }));
}

#[cfg(not(feature = "store-postgres"))]
#[rstest]
#[tokio::test]
async fn postgres_target_needs_the_feature() {
    let target = StoreTarget::Postgres(PostgresTarget {
        host: "localhost".to_owned(),
        port: 5432,
        user: "crawler".to_owned(),
        password: String::new(),
        database: "gis".to_owned(),
        init_schema: false,
    });

    let err = open_store(&target, NonZeroUsize::MIN)
        .await
        .expect_err("PostGIS support not compiled in");
    match err {
        CliError::MissingFeature { feature, .. } => assert_eq!(feature, "store-postgres"),
        other => panic!("expected MissingFeature, found {other:?}"),
    }
}
