//! The default persisted record shape and its error payload.
//!
//! A [`LogRecord`] is built at write time, serialized immediately, and never
//! mutated afterwards. Its persisted form follows three conventions, applied
//! here as per-field serde attributes rather than process-global serializer
//! state so multiple adapters can coexist in one process:
//!
//! - fields holding their type's zero/default value are omitted,
//! - enumerated fields persist as their string name,
//! - unrecognized fields found when reading back are ignored.

use bson::oid::ObjectId;
use bson::ser::serialize_to_bson;
use bson::{Bson, DateTime, Document};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;

use crate::error::{LogError, LogResult};
use crate::level::LogLevel;

/// Field name of the persisted timestamp.
pub const TIMESTAMP_FIELD: &str = "timestamp";
/// Field name of the persisted level.
pub const LEVEL_FIELD: &str = "level";
/// Field name of the persisted payload.
pub const DATA_FIELD: &str = "data";
/// Field name of the persisted error payload.
pub const ERROR_FIELD: &str = "error";

/// The default shape of a persisted log record.
///
/// The identifier is assigned by the database: it is `None` on every record
/// this layer builds and only populated on records read back after
/// persistence. The timestamp is set at construction time, never supplied by
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord<TData> {
    /// Database-assigned identity, present only after persistence.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// The moment the record was constructed.
    pub timestamp: DateTime,
    /// Severity, omitted from the persisted form at its zero value.
    #[serde(default, skip_serializing_if = "LogLevel::is_default")]
    pub level: LogLevel,
    /// The caller's payload, stored as-is.
    pub data: TData,
    /// Error details, if the entry was written with one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl<TData> LogRecord<TData> {
    /// Builds a record with the current timestamp and no identity.
    pub fn new(level: LogLevel, data: TData, error: Option<ErrorInfo>) -> Self {
        Self {
            id: None,
            timestamp: DateTime::now(),
            level,
            data,
            error,
        }
    }
}

impl<TData: Serialize> LogRecord<TData> {
    /// Serializes this record into its persisted document form.
    pub fn to_document(&self) -> LogResult<Document> {
        encode_document(self)
    }
}

impl<TData: DeserializeOwned> LogRecord<TData> {
    /// Rebuilds a record from its persisted document form.
    pub fn from_document(document: Document) -> LogResult<Self> {
        Ok(bson::de::deserialize_from_bson(Bson::Document(document))?)
    }
}

/// Serializes any value into a storage document.
///
/// Errors if the value does not serialize to a document (e.g. a bare scalar),
/// since top-level entries in a collection must be documents.
pub fn encode_document<T: Serialize>(value: &T) -> LogResult<Document> {
    match serialize_to_bson(value)? {
        Bson::Document(document) => Ok(document),
        other => Err(LogError::Serialization(format!(
            "log entries must serialize to a document, got {:?}",
            other.element_type()
        ))),
    }
}

/// Error details embedded in a log record.
///
/// Owns at most one level of nested [`InnerErrorInfo`]; deeper cause chains
/// are truncated at shaping time.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric result code, omitted when zero.
    #[serde(default, skip_serializing_if = "code_is_default")]
    pub code: i32,
    /// Link to documentation about the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_link: Option<String>,
    /// The error's display message.
    pub message: String,
    /// The component the error originated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Captured backtrace, when the process records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    /// The immediate cause, one level deep only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<InnerErrorInfo>,
}

impl ErrorInfo {
    /// Builds error details from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Copies details out of an error value.
    ///
    /// Takes the display message, one level of [`source`] as the inner
    /// record, and a backtrace when the process captures them
    /// (`RUST_BACKTRACE=1`). Deeper cause chains are truncated.
    ///
    /// [`source`]: std::error::Error::source
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        Self {
            code: 0,
            help_link: None,
            message: error.to_string(),
            source: None,
            stack_trace: capture_backtrace(),
            inner: error.source().map(InnerErrorInfo::from_error),
        }
    }

    /// Sets the numeric result code.
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    /// Sets the help link.
    pub fn with_help_link(mut self, help_link: impl Into<String>) -> Self {
        self.help_link = Some(help_link.into());
        self
    }

    /// Sets the originating component.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the stack trace.
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}

/// The immediate cause of an [`ErrorInfo`]. Carries the same scalar fields
/// but no further nesting.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerErrorInfo {
    /// Numeric result code, omitted when zero.
    #[serde(default, skip_serializing_if = "code_is_default")]
    pub code: i32,
    /// Link to documentation about the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_link: Option<String>,
    /// The error's display message.
    pub message: String,
    /// The component the error originated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Captured backtrace, when one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl InnerErrorInfo {
    /// Copies details out of an error value, ignoring any further causes.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        Self {
            message: error.to_string(),
            ..Self::default()
        }
    }
}

fn code_is_default(code: &i32) -> bool {
    *code == 0
}

fn capture_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
