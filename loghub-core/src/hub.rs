//! Fan-out of one log call to every registered backend.
//!
//! The [`LoggerHub`] owns the hosting configuration (when one was supplied),
//! a [`ServiceRegistry`] adapters register themselves into, and the set of
//! [`Logger`] backends a write fans out to. Adapter crates attach through
//! extension traits on the hub.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use bson::ser::serialize_to_bson;
use config::Config;
use serde::Serialize;

use crate::error::{LogError, LogResult};
use crate::level::LogLevel;
use crate::logger::Logger;
use crate::record::ErrorInfo;

/// A by-type registry of shared service instances.
///
/// Adapters register themselves here as singletons so the hosting application
/// can retrieve a concrete adapter (for its typed query API) after wiring.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service instance, replacing and returning any previous
    /// instance of the same type.
    pub fn insert<S: Send + Sync + 'static>(&mut self, service: S) -> Option<S> {
        self.entries
            .insert(TypeId::of::<S>(), Box::new(service))
            .and_then(|previous| previous.downcast::<S>().ok())
            .map(|previous| *previous)
    }

    /// Retrieves the registered instance of `S`, if any.
    pub fn get<S: Send + Sync + 'static>(&self) -> Option<&S> {
        self.entries
            .get(&TypeId::of::<S>())
            .and_then(|service| service.downcast_ref::<S>())
    }

    /// Whether an instance of `S` is registered.
    pub fn contains<S: Send + Sync + 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<S>())
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dispatches a single log call to every registered logger backend.
#[derive(Default)]
pub struct LoggerHub {
    configuration: Option<Config>,
    services: ServiceRegistry,
    loggers: Vec<Arc<dyn Logger>>,
}

impl LoggerHub {
    /// Creates a hub with no configuration attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hub holding the hosting application's configuration.
    ///
    /// Adapters added through registration extensions resolve their options
    /// from this configuration when present.
    pub fn with_configuration(configuration: Config) -> Self {
        Self {
            configuration: Some(configuration),
            ..Self::default()
        }
    }

    /// The hosting configuration, when one was supplied.
    pub fn configuration(&self) -> Option<&Config> {
        self.configuration.as_ref()
    }

    /// The shared service registry.
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Mutable access to the shared service registry.
    pub fn services_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.services
    }

    /// Registers a logger backend with the fan-out set.
    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) -> &mut Self {
        self.loggers.push(logger);
        self
    }

    /// The registered backends, in registration order.
    pub fn loggers(&self) -> &[Arc<dyn Logger>] {
        &self.loggers
    }

    /// Writes one entry to every backend whose minimum level admits it.
    ///
    /// The payload is encoded once and shared. Every admitted backend is
    /// attempted even when an earlier one fails; the first failure is
    /// returned afterwards and any further failures are emitted as warnings.
    pub async fn write<T: Serialize>(
        &self,
        level: LogLevel,
        data: &T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        let payload = serialize_to_bson(data)?;
        let mut first_failure: Option<LogError> = None;

        for logger in &self.loggers {
            if level < logger.log_level() {
                continue;
            }
            if let Err(failure) = logger
                .write_document(level, payload.clone(), error.clone())
                .await
            {
                if first_failure.is_none() {
                    first_failure = Some(failure);
                } else {
                    tracing::warn!(%failure, "additional logger backend failed during fan-out");
                }
            }
        }

        match first_failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// Writes an entry at [`LogLevel::Trace`].
    pub async fn trace<T: Serialize>(&self, data: &T, error: Option<ErrorInfo>) -> LogResult<()> {
        self.write(LogLevel::Trace, data, error).await
    }

    /// Writes an entry at [`LogLevel::Debug`].
    pub async fn debug<T: Serialize>(&self, data: &T, error: Option<ErrorInfo>) -> LogResult<()> {
        self.write(LogLevel::Debug, data, error).await
    }

    /// Writes an entry at [`LogLevel::Information`].
    pub async fn information<T: Serialize>(
        &self,
        data: &T,
        error: Option<ErrorInfo>,
    ) -> LogResult<()> {
        self.write(LogLevel::Information, data, error).await
    }

    /// Writes an entry at [`LogLevel::Warning`].
    pub async fn warning<T: Serialize>(&self, data: &T, error: Option<ErrorInfo>) -> LogResult<()> {
        self.write(LogLevel::Warning, data, error).await
    }

    /// Writes an entry at [`LogLevel::Error`].
    pub async fn error<T: Serialize>(&self, data: &T, error: Option<ErrorInfo>) -> LogResult<()> {
        self.write(LogLevel::Error, data, error).await
    }

    /// Writes an entry at [`LogLevel::Critical`].
    pub async fn critical<T: Serialize>(&self, data: &T, error: Option<ErrorInfo>) -> LogResult<()> {
        self.write(LogLevel::Critical, data, error).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_one_instance_per_type() {
        let mut services = ServiceRegistry::new();
        assert!(services.insert(String::from("first")).is_none());
        assert_eq!(services.insert(String::from("second")).as_deref(), Some("first"));
        assert_eq!(services.get::<String>().map(String::as_str), Some("second"));
        assert_eq!(services.len(), 1);
        assert!(!services.contains::<u32>());
    }
}
