//! Hub registration for the MongoDB backend.

use std::sync::Arc;

use async_trait::async_trait;

use loghub_core::error::LogResult;
use loghub_core::hub::LoggerHub;

use crate::logger::MongoLogger;
use crate::options::MongoLoggerOptions;

/// Attaches MongoDB logging to a [`LoggerHub`].
#[async_trait]
pub trait MongoLoggerHubExt {
    /// Adds a MongoDB logger with default options. When the hub carries a
    /// hosting configuration, options resolve from its `loghub.mongodb`
    /// section instead.
    async fn add_mongodb(&mut self) -> LogResult<&mut Self>;

    /// Adds a MongoDB logger with code-configured options, built by mutating
    /// the defaults.
    async fn add_mongodb_with<F>(&mut self, mutate: F) -> LogResult<&mut Self>
    where
        F: FnOnce(&mut MongoLoggerOptions) + Send;
}

#[async_trait]
impl MongoLoggerHubExt for LoggerHub {
    async fn add_mongodb(&mut self) -> LogResult<&mut Self> {
        let options = match self.configuration() {
            Some(configuration) => MongoLoggerOptions::from_configuration(configuration)?,
            None => MongoLoggerOptions::default(),
        };
        Ok(attach(self, MongoLogger::with_options(options).await?))
    }

    async fn add_mongodb_with<F>(&mut self, mutate: F) -> LogResult<&mut Self>
    where
        F: FnOnce(&mut MongoLoggerOptions) + Send,
    {
        Ok(attach(self, MongoLogger::with(mutate).await?))
    }
}

/// Registers the logger as a singleton service and adds it to the fan-out
/// set. The registered `Arc<MongoLogger>` is retrievable from
/// [`LoggerHub::services`] for the typed query API.
fn attach(hub: &mut LoggerHub, logger: MongoLogger) -> &mut LoggerHub {
    let logger = Arc::new(logger);
    hub.services_mut().insert(Arc::clone(&logger));
    hub.add_logger(logger)
}
