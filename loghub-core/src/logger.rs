//! The object-safe capability every logging backend implements.
//!
//! Typed, generic write methods live on the concrete backends; this trait is
//! the dynamic seam the [hub](crate::hub) fans out through, so payloads cross
//! it already encoded to BSON.

use async_trait::async_trait;
use bson::Bson;

use crate::error::LogResult;
use crate::level::LogLevel;
use crate::record::ErrorInfo;

/// A logging backend registered with the hub.
///
/// Implementations must be safe for concurrent use from multiple tasks; the
/// hub adds no locking of its own.
#[async_trait]
pub trait Logger: Send + Sync {
    /// Minimum level this backend accepts on the hub path.
    fn log_level(&self) -> LogLevel;

    /// Persists one entry with an already-encoded payload.
    async fn write_document(
        &self,
        level: LogLevel,
        data: Bson,
        error: Option<ErrorInfo>,
    ) -> LogResult<()>;

    /// Opens a logical scope. Scopes are not supported by document-store
    /// backends; the returned guard does nothing.
    fn begin_scope(&self, data: Bson) -> Scope {
        let _ = data;
        Scope
    }
}

/// Inert guard returned by [`Logger::begin_scope`]. Dropping it has no
/// effect.
#[derive(Debug, Default)]
pub struct Scope;
