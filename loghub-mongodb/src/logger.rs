//! The MongoDB logger facade.

use std::marker::PhantomData;

use async_trait::async_trait;
use bson::Bson;
use config::Config;
use futures::TryStreamExt;
use mongodb::Cursor;
use serde::Serialize;
use serde::de::DeserializeOwned;

use loghub_core::error::{LogError, LogResult};
use loghub_core::level::LogLevel;
use loghub_core::logger::{Logger, Scope};
use loghub_core::query::{Expr, Query, Sort, SortDirection};
use loghub_core::record::{ErrorInfo, LogRecord};

use crate::context::MongoLogContext;
use crate::options::MongoLoggerOptions;

/// Writes structured log records to a MongoDB collection and queries them
/// back.
///
/// Two write paths exist, chosen explicitly at the call site: the
/// default-shaped path ([`write`](Self::write) and the level shorthands)
/// builds a [`LogRecord`] around the payload, while
/// [`write_shaped`](Self::write_shaped) persists whatever document the
/// caller's encoder returns. Queries mirror the split:
/// [`logs`](Self::logs) reads default-shaped records,
/// [`custom_logs`](Self::custom_logs) reads any document type.
///
/// Dropping the logger abandons the connection; call
/// [`shutdown`](Self::shutdown) for an orderly release. `shutdown` consumes
/// the logger, so a disposed instance cannot be written to by construction.
#[derive(Debug)]
pub struct MongoLogger {
    pub(crate) context: MongoLogContext,
}

impl MongoLogger {
    /// Creates a logger with default options.
    ///
    /// Default options carry no connection URL, so this fails with
    /// [`LogError::InvalidOptions`]; prefer [`with`](Self::with) or
    /// [`from_configuration`](Self::from_configuration).
    pub async fn new() -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::default()).await
    }

    /// Creates a logger with the given options.
    pub async fn with_options(options: MongoLoggerOptions) -> LogResult<Self> {
        Ok(Self {
            context: MongoLogContext::connect(options).await?,
        })
    }

    /// Creates a logger by mutating the default options.
    pub async fn with(mutate: impl FnOnce(&mut MongoLoggerOptions)) -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::with(mutate)).await
    }

    /// Creates a logger with options resolved from the hosting
    /// configuration's `loghub.mongodb` section.
    pub async fn from_configuration(configuration: &Config) -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::from_configuration(configuration)?).await
    }

    /// The options this logger was built with.
    pub fn options(&self) -> &MongoLoggerOptions {
        self.context.options()
    }

    /// Persists the caller's document exactly as supplied, bypassing record
    /// shaping entirely.
    pub async fn write_raw<T: Serialize + Send + Sync>(&self, document: &T) -> LogResult<()> {
        self.context.insert_one(document).await
    }

    /// Writes a default-shaped record: current timestamp, level, payload,
    /// and optional error details.
    pub async fn write<T: Serialize + Send + Sync>(
        &self,
        level: LogLevel,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        let record = LogRecord::new(level, data, error);
        self.context.insert_one(&record).await
    }

    /// Writes a custom-shaped record: the encoder's output is persisted
    /// verbatim, without validation or further shaping.
    ///
    /// An encoder failure is the caller's to surface; nothing substitutes a
    /// default shape.
    pub async fn write_shaped<T, D>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
        shape: impl FnOnce(T, Option<ErrorInfo>) -> D,
    ) -> LogResult<()>
    where
        D: Serialize + Send + Sync,
    {
        let document = shape(data, error);
        self.context.insert_one(&document).await
    }

    /// Adapts a message-rendering formatter to the default-shaped path: the
    /// rendered string becomes the record's payload.
    ///
    /// `event_id` is accepted for interface compatibility with hosting
    /// frameworks and is not persisted.
    pub async fn write_message<T>(
        &self,
        level: LogLevel,
        event_id: u64,
        data: T,
        error: Option<ErrorInfo>,
        render: impl FnOnce(&T, Option<&ErrorInfo>) -> String,
    ) -> LogResult<()> {
        let _ = event_id;
        let message = render(&data, error.as_ref());
        self.write(level, message, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Trace`].
    pub async fn trace<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Trace, data, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Debug`].
    pub async fn debug<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Debug, data, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Information`].
    pub async fn information<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Information, data, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Warning`].
    pub async fn warning<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Warning, data, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Error`].
    pub async fn error<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Error, data, error).await
    }

    /// Writes a default-shaped record at [`LogLevel::Critical`].
    pub async fn critical<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Critical, data, error).await
    }

    /// Starts a lazy query over default-shaped records with payload type
    /// `TData`.
    pub fn logs<TData>(&self) -> LogFinder<'_, LogRecord<TData>>
    where
        TData: DeserializeOwned + Send + Sync,
    {
        LogFinder::new(&self.context)
    }

    /// Starts a lazy query over custom-shaped records.
    pub fn custom_logs<TDocument>(&self) -> LogFinder<'_, TDocument>
    where
        TDocument: DeserializeOwned + Send + Sync,
    {
        LogFinder::new(&self.context)
    }

    /// Opens a logical scope. This backend does not support scopes; the
    /// returned guard does nothing.
    pub fn begin_scope<T: Serialize>(&self, data: &T) -> Scope {
        let _ = data;
        Scope
    }

    /// Releases the underlying client. Consuming `self` makes use after
    /// disposal a compile error rather than a runtime one.
    pub async fn shutdown(self) {
        self.context.shutdown().await;
    }
}

#[async_trait]
impl Logger for MongoLogger {
    fn log_level(&self) -> LogLevel {
        self.options().log_level
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

/// A lazy query over one collection.
///
/// Building a finder performs no I/O: filters, sort, limit, and offset
/// accumulate in memory, and the database is only contacted by the terminal
/// [`fetch`](Self::fetch) / [`collect`](Self::collect) calls.
#[derive(Debug)]
pub struct LogFinder<'a, T> {
    context: &'a MongoLogContext,
    query: Query,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> LogFinder<'a, T>
where
    T: DeserializeOwned + Send + Sync,
{
    fn new(context: &'a MongoLogContext) -> Self {
        Self {
            context,
            query: Query::new(),
            _marker: PhantomData,
        }
    }

    /// Adds a filter expression, AND-combined with any prior one.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.query.filter = Some(match self.query.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Sorts the results by a field.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Skips the first `offset` results.
    pub fn skip(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Replaces the accumulated query wholesale.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Executes the query, returning the driver's lazy cursor to consume as
    /// a stream.
    pub async fn fetch(self) -> LogResult<Cursor<T>> {
        self.context.find(self.query).await
    }

    /// Executes the query and materializes every match.
    pub async fn collect(self) -> LogResult<Vec<T>> {
        self.fetch()
            .await?
            .try_collect()
            .await
            .map_err(LogError::backend)
    }
}
