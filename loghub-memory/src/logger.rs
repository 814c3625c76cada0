//! The in-memory logger backend.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};
use mea::rwlock::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;

use loghub_core::error::LogResult;
use loghub_core::level::LogLevel;
use loghub_core::logger::Logger;
use loghub_core::query::{Query, SortDirection};
use loghub_core::record::{ErrorInfo, LogRecord, encode_document};

use crate::evaluator::{Comparable, DocumentEvaluator};

/// Options for the in-memory backend.
#[derive(Debug, Clone)]
pub struct MemoryLoggerOptions {
    /// Minimum level accepted on the hub path.
    pub log_level: LogLevel,
    /// Oldest-first eviction bound. `None` keeps every record.
    pub max_records: Option<usize>,
}

impl Default for MemoryLoggerOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Trace,
            max_records: None,
        }
    }
}

/// Thread-safe in-memory logger.
///
/// Records are held as BSON documents in insertion order. Clones share the
/// same underlying buffer, so a clone handed to the hub and one kept for
/// queries observe the same records.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    options: MemoryLoggerOptions,
    records: Arc<RwLock<Vec<Document>>>,
}

impl MemoryLogger {
    /// Creates an unbounded logger accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger with the given options.
    pub fn with_options(options: MemoryLoggerOptions) -> Self {
        Self {
            options,
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a logger that keeps at most `max_records`, evicting oldest.
    pub fn bounded(max_records: usize) -> Self {
        Self::with_options(MemoryLoggerOptions {
            max_records: Some(max_records),
            ..MemoryLoggerOptions::default()
        })
    }

    /// The options this logger was built with.
    pub fn options(&self) -> &MemoryLoggerOptions {
        &self.options
    }

    /// Writes a default-shaped record.
    pub async fn write<T: Serialize>(
        &self,
        level: LogLevel,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        let document = LogRecord::new(level, data, error).to_document()?;
        self.push(document).await;
        Ok(())
    }

    /// Stores the caller's document exactly as supplied, without shaping.
    pub async fn write_raw<T: Serialize>(&self, document: &T) -> LogResult<()> {
        let document = encode_document(document)?;
        self.push(document).await;
        Ok(())
    }

    async fn push(&self, document: Document) {
        let mut records = self.records.write().await;
        records.push(document);
        if let Some(bound) = self.options.max_records {
            let excess = records.len().saturating_sub(bound);
            if excess > 0 {
                records.drain(..excess);
            }
        }
    }

    /// Runs a query over the stored documents.
    ///
    /// An absent filter matches everything. Sorting, offset, and limit apply
    /// after filtering, in that order.
    pub async fn find(&self, query: Query) -> LogResult<Vec<Document>> {
        let records = self.records.read().await;

        let mut matched = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(records.iter(), filter)?,
            None => records.iter().cloned().collect::<Vec<_>>(),
        };
        drop(records);

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let left = a.get(&sort.field).map(Comparable::from).unwrap_or(Comparable::Null);
                let right = b.get(&sort.field).map(Comparable::from).unwrap_or(Comparable::Null);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        Ok(matched
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Runs a query and decodes the matches as default-shaped records.
    pub async fn find_records<TData: DeserializeOwned>(
        &self,
        query: Query,
    ) -> LogResult<Vec<LogRecord<TData>>> {
        self.find(query)
            .await?
            .into_iter()
            .map(LogRecord::from_document)
            .collect()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Discards every stored record.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl Logger for MemoryLogger {
    fn log_level(&self) -> LogLevel {
        self.options.log_level
    }

    async fn write_document(
        &self,
        level: LogLevel,
        data: Bson,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(level, data, error).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use loghub_core::query::{Filter, Query};
    use loghub_core::record::{ERROR_FIELD, LEVEL_FIELD};

    #[tokio::test]
    async fn round_trip_preserves_payload_and_omits_error() {
        let logger = MemoryLogger::new();
        logger
            .write(LogLevel::Information, "deploy finished", None)
            .await
            .unwrap();

        let records: Vec<LogRecord<String>> =
            logger.find_records(Query::new()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "deploy finished");
        assert!(records[0].error.is_none());

        // The raw document must not even carry the field.
        let raw = logger.find(Query::new()).await.unwrap();
        assert!(!raw[0].contains_key(ERROR_FIELD));
    }

    #[tokio::test]
    async fn round_trip_preserves_error_details() {
        let logger = MemoryLogger::new();
        let details = ErrorInfo::new("write failed")
            .with_source("importer")
            .with_stack_trace("importer::run\nimporter::flush");
        logger
            .write(LogLevel::Error, "import aborted", Some(details.clone()))
            .await
            .unwrap();

        let records: Vec<LogRecord<String>> =
            logger.find_records(Query::new()).await.unwrap();
        let stored = records[0].error.as_ref().expect("error details kept");
        assert_eq!(stored.message, details.message);
        assert_eq!(stored.source, details.source);
        assert_eq!(stored.stack_trace, details.stack_trace);
        assert!(stored.inner.is_none());
    }

    #[tokio::test]
    async fn raw_writes_keep_the_caller_shape() {
        let logger = MemoryLogger::new();
        logger.write_raw(&doc! { "tag": "x" }).await.unwrap();

        let raw = logger.find(Query::new()).await.unwrap();
        assert_eq!(raw[0], doc! { "tag": "x" });
    }

    #[tokio::test]
    async fn bounded_buffer_evicts_oldest_first() {
        let logger = MemoryLogger::bounded(10);
        for n in 0..25_i64 {
            logger.write(LogLevel::Debug, n, None).await.unwrap();
        }

        assert_eq!(logger.len().await, 10);
        let records: Vec<LogRecord<i64>> =
            logger.find_records(Query::new()).await.unwrap();
        assert_eq!(records.first().unwrap().data, 15);
        assert_eq!(records.last().unwrap().data, 24);
    }

    #[tokio::test]
    async fn filters_apply_to_stored_level_names() {
        let logger = MemoryLogger::new();
        logger.write(LogLevel::Trace, "noise", None).await.unwrap();
        logger.write(LogLevel::Warning, "pressure", None).await.unwrap();
        logger.write(LogLevel::Critical, "outage", None).await.unwrap();

        let severe = logger
            .find(Query::builder().filter(Filter::at_least(LogLevel::Warning)).build())
            .await
            .unwrap();
        assert_eq!(severe.len(), 2);

        // Trace records persist without a level field, and still match a
        // trace-and-above filter.
        let everything = logger
            .find(Query::builder().filter(Filter::at_least(LogLevel::Trace)).build())
            .await
            .unwrap();
        assert_eq!(everything.len(), 3);
        assert!(!everything[0].contains_key(LEVEL_FIELD));
    }

    #[tokio::test]
    async fn sort_and_limit_compose() {
        let logger = MemoryLogger::new();
        for n in [3_i64, 1, 2] {
            logger.write_raw(&doc! { "data": n }).await.unwrap();
        }

        let top = logger
            .find(
                Query::builder()
                    .sort("data", SortDirection::Desc)
                    .limit(2)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].get_i64("data").unwrap(), 3);
        assert_eq!(top[1].get_i64("data").unwrap(), 2);
    }
}
