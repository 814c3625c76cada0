//! Error and result types for logging operations.
//!
//! Use [`LogResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when writing or querying logs.
#[derive(Error, Debug)]
pub enum LogError {
    /// The hosting configuration is missing a required section or holds a
    /// malformed value. Raised at options-resolution time, before any
    /// database interaction.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The resolved options are not usable (e.g. capped sizing bounds of zero,
    /// or a connection URL that names no database).
    #[error("invalid logger options: {0}")]
    InvalidOptions(String),
    /// Serialization/deserialization error when converting between record
    /// shapes and the storage format.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An error surfaced by the underlying storage backend or driver. The
    /// original error is preserved as this variant's [`source`], so callers
    /// can downcast and inspect it.
    ///
    /// [`source`]: std::error::Error::source
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl LogError {
    /// Wraps a backend/driver error without flattening it to a string.
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        LogError::Backend(Box::new(error))
    }
}

/// A specialized `Result` type for logging operations.
pub type LogResult<T> = Result<T, LogError>;

impl From<BsonError> for LogError {
    fn from(err: BsonError) -> Self {
        LogError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for LogError {
    fn from(err: SerdeJsonError) -> Self {
        LogError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::fmt;

    #[derive(Debug)]
    struct DriverFailure;

    impl fmt::Display for DriverFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl std::error::Error for DriverFailure {}

    #[test]
    fn backend_errors_keep_their_source() {
        let err = LogError::backend(DriverFailure);
        assert_eq!(err.to_string(), "backend error: connection reset");
        assert!(err.source().is_some_and(|s| s.is::<DriverFailure>()));
    }
}
