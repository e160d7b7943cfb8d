//! Focused unit tests covering crawl configuration resolution.

use super::*;
use crate::crawl::{CrawlSettings, PostgresTarget, StoreTarget};
use camino::Utf8PathBuf;
use geomarker_core::PageSize;
use geomarker_crawler::{CrawlConfig, CrawlError};
use geomarker_data::mediawiki::{DEFAULT_ENDPOINT, MediaWikiConfig};
use geomarker_data::store::DEFAULT_PG_PORT;
use rstest::{fixture, rstest};
use std::time::Duration;

#[fixture]
fn sqlite_args() -> CrawlArgs {
    CrawlArgs {
        sqlite: Some(Utf8PathBuf::from("markers.db")),
        ..CrawlArgs::default()
    }
}

#[fixture]
fn postgres_args() -> CrawlArgs {
    CrawlArgs {
        db_host: Some("db.internal".to_owned()),
        db_user: Some("crawler".to_owned()),
        db_name: Some("gis".to_owned()),
        ..CrawlArgs::default()
    }
}

#[rstest]
fn sqlite_only_uses_defaults(sqlite_args: CrawlArgs) {
    let settings = CrawlSettings::try_from(sqlite_args).expect("settings resolve");

    assert_eq!(
        settings.store,
        StoreTarget::Sqlite(Utf8PathBuf::from("markers.db"))
    );
    assert_eq!(settings.mediawiki, MediaWikiConfig::default());
    assert_eq!(settings.mediawiki.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.crawl, CrawlConfig::default());
}

#[rstest]
fn overrides_reach_client_and_pipeline(sqlite_args: CrawlArgs) {
    let args = CrawlArgs {
        endpoint: Some("https://de.wikipedia.org/w/api.php".to_owned()),
        user_agent: Some("geomarker-test/1.0".to_owned()),
        page_size: Some(50),
        listing_timeout_secs: Some(45),
        lookup_timeout_secs: Some(5),
        write_workers: Some(2),
        queue_capacity: Some(16),
        ..sqlite_args
    };

    let settings = CrawlSettings::try_from(args).expect("settings resolve");

    assert_eq!(settings.mediawiki.endpoint, "https://de.wikipedia.org/w/api.php");
    assert_eq!(settings.mediawiki.user_agent, "geomarker-test/1.0");
    assert_eq!(settings.mediawiki.listing_timeout, Duration::from_secs(45));
    assert_eq!(settings.mediawiki.lookup_timeout, Duration::from_secs(5));
    assert_eq!(
        settings.crawl.page_size,
        PageSize::new(50).expect("valid page size")
    );
    assert_eq!(settings.crawl.write_workers.get(), 2);
    assert_eq!(settings.crawl.queue_capacity.get(), 16);
}

#[rstest]
fn no_store_is_rejected() {
    let err = CrawlSettings::try_from(CrawlArgs::default()).expect_err("store required");
    match err {
        CliError::MissingStore { sqlite, db_host } => {
            assert_eq!(sqlite, ARG_CRAWL_SQLITE);
            assert_eq!(db_host, ARG_CRAWL_DB_HOST);
        }
        other => panic!("expected MissingStore, found {other:?}"),
    }
}

#[rstest]
fn both_stores_are_rejected(postgres_args: CrawlArgs) {
    let args = CrawlArgs {
        sqlite: Some(Utf8PathBuf::from("markers.db")),
        ..postgres_args
    };
    let err = CrawlSettings::try_from(args).expect_err("stores are exclusive");
    assert!(matches!(err, CliError::ConflictingStores { .. }));
}

#[rstest]
fn postgres_defaults_port_and_password(postgres_args: CrawlArgs) {
    let settings = CrawlSettings::try_from(postgres_args).expect("settings resolve");
    assert_eq!(
        settings.store,
        StoreTarget::Postgres(PostgresTarget {
            host: "db.internal".to_owned(),
            port: DEFAULT_PG_PORT,
            user: "crawler".to_owned(),
            password: String::new(),
            database: "gis".to_owned(),
            init_schema: false,
        })
    );
    assert_eq!(DEFAULT_PG_PORT, 5432);
}

#[rstest]
fn postgres_target_keeps_explicit_values(postgres_args: CrawlArgs) {
    let args = CrawlArgs {
        db_port: Some(6543),
        db_password: Some("s3cret".to_owned()),
        init_schema: true,
        ..postgres_args
    };
    let settings = CrawlSettings::try_from(args).expect("settings resolve");
    let StoreTarget::Postgres(target) = settings.store else {
        panic!("expected a PostGIS target");
    };
    assert_eq!(target.port, 6543);
    assert_eq!(target.password, "s3cret");
    assert!(target.init_schema);
    assert!(!format!("{target:?}").contains("s3cret"));
}

#[rstest]
#[case::missing_user(None, Some("gis"), ARG_CRAWL_DB_USER, ENV_CRAWL_DB_USER)]
#[case::missing_name(Some("crawler"), None, ARG_CRAWL_DB_NAME, ENV_CRAWL_DB_NAME)]
fn postgres_requires_user_and_database(
    #[case] user: Option<&str>,
    #[case] database: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = CrawlArgs {
        db_host: Some("localhost".to_owned()),
        db_user: user.map(str::to_owned),
        db_name: database.map(str::to_owned),
        ..CrawlArgs::default()
    };
    let err = CrawlSettings::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::zero(0)]
#[case::above_api_limit(501)]
fn page_size_outside_api_range_is_rejected(sqlite_args: CrawlArgs, #[case] size: u32) {
    let args = CrawlArgs {
        page_size: Some(size),
        ..sqlite_args
    };
    let err = CrawlSettings::try_from(args).expect_err("page size rejected");
    assert!(matches!(err, CliError::InvalidPageSize(_)));
}

#[rstest]
#[case::workers(ARG_CRAWL_WRITE_WORKERS)]
#[case::capacity(ARG_CRAWL_QUEUE_CAPACITY)]
#[case::listing_timeout(ARG_CRAWL_LISTING_TIMEOUT)]
#[case::lookup_timeout(ARG_CRAWL_LOOKUP_TIMEOUT)]
fn zero_values_are_rejected(sqlite_args: CrawlArgs, #[case] field: &'static str) {
    let mut args = sqlite_args;
    match field {
        ARG_CRAWL_WRITE_WORKERS => args.write_workers = Some(0),
        ARG_CRAWL_QUEUE_CAPACITY => args.queue_capacity = Some(0),
        ARG_CRAWL_LISTING_TIMEOUT => args.listing_timeout_secs = Some(0),
        _ => args.lookup_timeout_secs = Some(0),
    }
    let err = CrawlSettings::try_from(args).expect_err("zero rejected");
    match err {
        CliError::ZeroValue { field: rejected } => assert_eq!(rejected, field),
        other => panic!("expected ZeroValue, found {other:?}"),
    }
}

#[rstest]
fn parses_crawl_flags() {
    let cli = Cli::try_parse_from([
        "geomarker",
        "crawl",
        "--sqlite",
        "out/markers.db",
        "--page-size",
        "20",
        "--write-workers",
        "8",
        "--init-schema",
    ])
    .expect("flags parse");
    let Command::Crawl(args) = cli.command;
    assert_eq!(args.sqlite, Some(Utf8PathBuf::from("out/markers.db")));
    assert_eq!(args.page_size, Some(20));
    assert_eq!(args.write_workers, Some(8));
    assert!(args.init_schema);
    assert_eq!(args.db_host, None);
}

#[rstest]
#[case::no_subcommand(
    &["geomarker"],
    clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
)]
#[case::unknown_flag(
    &["geomarker", "crawl", "--bogus"],
    clap::error::ErrorKind::UnknownArgument
)]
fn malformed_invocations_are_rejected(
    #[case] argv: &[&str],
    #[case] expected: clap::error::ErrorKind,
) {
    let err = Cli::try_parse_from(argv.iter().copied()).expect_err("invocation rejected");
    assert_eq!(err.kind(), expected);
}

#[rstest]
#[case::cancelled(CliError::Crawl(CrawlError::Cancelled), EXIT_CANCELLED)]
#[case::missing_store(
    CliError::MissingStore { sqlite: ARG_CRAWL_SQLITE, db_host: ARG_CRAWL_DB_HOST },
    EXIT_FAILURE
)]
#[case::missing_feature(
    CliError::MissingFeature { feature: "store-postgres", action: "writing markers to PostGIS" },
    EXIT_FAILURE
)]
fn exit_codes_distinguish_cancellation(#[case] err: CliError, #[case] expected: i32) {
    assert_eq!(err.exit_code(), expected);
}

#[rstest]
fn missing_argument_names_flag_and_env() {
    let err = CliError::MissingArgument {
        field: ARG_CRAWL_DB_USER,
        env: ENV_CRAWL_DB_USER,
    };
    assert_eq!(
        err.to_string(),
        "missing db-user (set --db-user or GEOMARKER_CMDS_CRAWL_DB_USER)"
    );
}
