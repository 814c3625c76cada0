//! Integration tests against a running MongoDB instance.
//!
//! These are ignored by default; run them with a reachable server:
//!
//! ```sh
//! LOGHUB_TEST_URL=mongodb://localhost:27017/loghub_tests \
//!     cargo test -p loghub-mongodb -- --ignored
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use loghub_core::level::LogLevel;
use loghub_core::query::Filter;
use loghub_mongodb::{MongoLogger, MongoLoggerOptions};

fn test_options(test: &str) -> MongoLoggerOptions {
    let url = std::env::var("LOGHUB_TEST_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017/loghub_tests".to_string());
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    MongoLoggerOptions::with(|options| {
        options.database_url = Some(url);
        options.collection_name = format!("{test}_{nonce}");
    })
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn write_then_query_round_trip() {
    let logger = MongoLogger::with_options(test_options("round_trip"))
        .await
        .unwrap();

    logger
        .information("deploy finished".to_string(), None)
        .await
        .unwrap();

    let records = logger.logs::<String>().collect().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data, "deploy finished");
    assert!(records[0].error.is_none());
    assert!(records[0].id.is_some(), "identity assigned by the database");

    logger.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn provisioning_is_idempotent_across_instances() {
    let options = test_options("provision_twice");

    let first = MongoLogger::with_options(options.clone()).await.unwrap();
    first.trace(1_i64, None).await.unwrap();

    // A second logger observing the existing collection must neither fail
    // nor recreate it.
    let second = MongoLogger::with_options(options).await.unwrap();
    second.trace(2_i64, None).await.unwrap();

    let records = second.logs::<i64>().collect().await.unwrap();
    assert_eq!(records.len(), 2);

    first.shutdown().await;
    second.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn capped_collection_evicts_oldest() {
    let mut options = test_options("capped");
    options.capped = true;
    options.max_size = 1_000;
    options.max_documents = 10;

    let logger = MongoLogger::with_options(options).await.unwrap();
    for n in 0..25_i64 {
        logger.debug(n, None).await.unwrap();
    }

    let records = logger.logs::<i64>().collect().await.unwrap();
    assert!(records.len() <= 10, "count stays within the bound");
    assert_eq!(records.last().unwrap().data, 24, "newest entries survive");

    logger.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn level_filters_match_persisted_names() {
    let logger = MongoLogger::with_options(test_options("levels"))
        .await
        .unwrap();

    logger.trace("noise".to_string(), None).await.unwrap();
    logger.warning("pressure".to_string(), None).await.unwrap();
    logger.critical("outage".to_string(), None).await.unwrap();

    let severe = logger
        .logs::<String>()
        .filter(Filter::at_least(LogLevel::Warning))
        .collect()
        .await
        .unwrap();
    assert_eq!(severe.len(), 2);

    let everything = logger
        .logs::<String>()
        .filter(Filter::at_least(LogLevel::Trace))
        .collect()
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    logger.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn custom_shapes_persist_verbatim() {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Tagged {
        tag: String,
    }

    let logger = MongoLogger::with_options(test_options("custom_shape"))
        .await
        .unwrap();

    logger
        .write_shaped("ignored payload", None, |_, _| Tagged { tag: "x".into() })
        .await
        .unwrap();

    let stored = logger
        .custom_logs::<bson::Document>()
        .collect()
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get_str("tag").unwrap(), "x");
    // Exactly the encoder's shape plus the database identity.
    assert_eq!(stored[0].keys().count(), 2);
    assert!(stored[0].contains_key("_id"));

    logger.shutdown().await;
}
