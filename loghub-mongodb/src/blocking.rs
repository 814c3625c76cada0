//! Blocking facade over the asynchronous logger.
//!
//! Each call drives the corresponding async operation to completion on the
//! caller's thread over a private current-thread runtime, the same shape the
//! driver's own synchronous API takes. One call still means one database
//! round trip; there is no queue and no background scheduling.
//!
//! Do not use this facade from inside an async runtime; it blocks the
//! calling thread.

use config::Config;
use futures::TryStreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::{Builder, Runtime};

use loghub_core::error::{LogError, LogResult};
use loghub_core::level::LogLevel;
use loghub_core::query::Query;
use loghub_core::record::{ErrorInfo, LogRecord};

use crate::options::MongoLoggerOptions;

/// Blocking counterpart of [`crate::MongoLogger`].
///
/// Queries materialize their results on return; laziness is a property of
/// the async API.
#[derive(Debug)]
pub struct MongoLogger {
    inner: crate::MongoLogger,
    runtime: Runtime,
}

impl MongoLogger {
    /// Creates a logger with default options.
    pub fn new() -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::default())
    }

    /// Creates a logger with the given options.
    pub fn with_options(options: MongoLoggerOptions) -> LogResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LogError::backend)?;
        let inner = runtime.block_on(crate::MongoLogger::with_options(options))?;
        Ok(Self { inner, runtime })
    }

    /// Creates a logger by mutating the default options.
    pub fn with(mutate: impl FnOnce(&mut MongoLoggerOptions)) -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::with(mutate))
    }

    /// Creates a logger with options resolved from the hosting
    /// configuration's `loghub.mongodb` section.
    pub fn from_configuration(configuration: &Config) -> LogResult<Self> {
        Self::with_options(MongoLoggerOptions::from_configuration(configuration)?)
    }

    /// The options this logger was built with.
    pub fn options(&self) -> &MongoLoggerOptions {
        self.inner.options()
    }

    /// Persists the caller's document exactly as supplied, without shaping.
    pub fn write_raw<T: Serialize + Send + Sync>(&self, document: &T) -> LogResult<()> {
        self.runtime.block_on(self.inner.write_raw(document))
    }

    /// Writes a default-shaped record.
    pub fn write<T: Serialize + Send + Sync>(
        &self,
        level: LogLevel,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.runtime.block_on(self.inner.write(level, data, error))
    }

    /// Writes a custom-shaped record; the encoder's output is persisted
    /// verbatim.
    pub fn write_shaped<T, D>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
        shape: impl FnOnce(T, Option<ErrorInfo>) -> D,
    ) -> LogResult<()>
    where
        D: Serialize + Send + Sync,
    {
        self.runtime
            .block_on(self.inner.write_shaped(data, error, shape))
    }

    /// Adapts a message-rendering formatter to the default-shaped path.
    pub fn write_message<T>(
        &self,
        level: LogLevel,
        event_id: u64,
        data: T,
        error: Option<ErrorInfo>,
        render: impl FnOnce(&T, Option<&ErrorInfo>) -> String,
    ) -> LogResult<()> {
        self.runtime
            .block_on(self.inner.write_message(level, event_id, data, error, render))
    }

    /// Writes a default-shaped record at [`LogLevel::Trace`].
    pub fn trace<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Trace, data, error)
    }

    /// Writes a default-shaped record at [`LogLevel::Debug`].
    pub fn debug<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Debug, data, error)
    }

    /// Writes a default-shaped record at [`LogLevel::Information`].
    pub fn information<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Information, data, error)
    }

    /// Writes a default-shaped record at [`LogLevel::Warning`].
    pub fn warning<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Warning, data, error)
    }

    /// Writes a default-shaped record at [`LogLevel::Error`].
    pub fn error<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Error, data, error)
    }

    /// Writes a default-shaped record at [`LogLevel::Critical`].
    pub fn critical<T: Serialize + Send + Sync>(
        &self,
        data: T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Critical, data, error)
    }

    /// Runs a query over default-shaped records, materializing the results.
    pub fn logs<TData>(&self, query: Query) -> LogResult<Vec<LogRecord<TData>>>
    where
        TData: DeserializeOwned + Send + Sync,
    {
        self.custom_logs(query)
    }

    /// Runs a query over custom-shaped records, materializing the results.
    pub fn custom_logs<TDocument>(&self, query: Query) -> LogResult<Vec<TDocument>>
    where
        TDocument: DeserializeOwned + Send + Sync,
    {
        self.runtime.block_on(async {
            self.inner
                .context
                .find::<TDocument>(query)
                .await?
                .try_collect()
                .await
                .map_err(LogError::backend)
        })
    }

    /// Releases the underlying client.
    pub fn shutdown(self) {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.shutdown());
    }
}
