//! Hub fan-out behavior over in-memory backends.

use std::sync::Arc;

use loghub::memory::{MemoryLogger, MemoryLoggerOptions};
use loghub::prelude::*;

#[tokio::test]
async fn one_call_reaches_every_backend() {
    let first = MemoryLogger::new();
    let second = MemoryLogger::new();

    let mut hub = LoggerHub::new();
    hub.add_logger(Arc::new(first.clone()))
        .add_logger(Arc::new(second.clone()));

    hub.information(&"service started", None).await.unwrap();

    assert_eq!(first.len().await, 1);
    assert_eq!(second.len().await, 1);
}

#[tokio::test]
async fn backends_below_their_minimum_level_are_skipped() {
    let verbose = MemoryLogger::new();
    let severe_only = MemoryLogger::with_options(MemoryLoggerOptions {
        log_level: LogLevel::Error,
        ..MemoryLoggerOptions::default()
    });

    let mut hub = LoggerHub::new();
    hub.add_logger(Arc::new(verbose.clone()))
        .add_logger(Arc::new(severe_only.clone()));

    hub.debug(&"chatter", None).await.unwrap();
    hub.critical(&"outage", None).await.unwrap();

    assert_eq!(verbose.len().await, 2);
    assert_eq!(severe_only.len().await, 1);
}

#[tokio::test]
async fn payloads_round_trip_through_the_hub() {
    let sink = MemoryLogger::new();

    let mut hub = LoggerHub::new();
    hub.add_logger(Arc::new(sink.clone()));

    hub.warning(&"disk pressure", None).await.unwrap();

    let records: Vec<LogRecord<String>> = sink.find_records(Query::new()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Warning);
    assert_eq!(records[0].data, "disk pressure");
    assert!(records[0].error.is_none());
}

#[tokio::test]
async fn error_details_survive_fan_out() {
    let sink = MemoryLogger::new();

    let mut hub = LoggerHub::new();
    hub.add_logger(Arc::new(sink.clone()));

    let details = ErrorInfo::new("write failed").with_source("importer");
    hub.error(&"import aborted", Some(details)).await.unwrap();

    let records: Vec<LogRecord<String>> = sink.find_records(Query::new()).await.unwrap();
    let stored = records[0].error.as_ref().expect("error details kept");
    assert_eq!(stored.message, "write failed");
    assert_eq!(stored.source.as_deref(), Some("importer"));
}

#[test]
fn a_hub_exposes_its_hosting_configuration() {
    let configuration = config::Config::builder()
        .add_source(config::File::from_str(
            "[loghub.mongodb]\ncollection_name = \"audit\"\n",
            config::FileFormat::Toml,
        ))
        .build()
        .unwrap();

    let hub = LoggerHub::with_configuration(configuration);
    // Registration extensions resolve adapter options from here.
    assert!(hub.configuration().is_some());
    assert!(LoggerHub::new().configuration().is_none());
}

#[tokio::test]
async fn registered_services_are_retrievable_by_type() {
    let sink = Arc::new(MemoryLogger::new());

    let mut hub = LoggerHub::new();
    hub.services_mut().insert(Arc::clone(&sink));
    hub.add_logger(sink);

    assert!(hub.services().contains::<Arc<MemoryLogger>>());
    let registered = hub.services().get::<Arc<MemoryLogger>>().unwrap();
    assert!(registered.is_empty().await);
}
