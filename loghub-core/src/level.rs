//! The ordered severity scale shared by every logging backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log record.
///
/// Levels are totally ordered from [`Trace`](LogLevel::Trace) (lowest) to
/// [`Critical`](LogLevel::Critical) (highest), and persist as their string
/// name rather than a numeric code. `Trace` is the zero value: a persisted
/// record omits the level field entirely when it holds `Trace`, and reads
/// restore the omission back to `Trace`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LogLevel {
    /// The most verbose level.
    #[default]
    Trace,
    /// Diagnostic information useful during development.
    Debug,
    /// General operational entries.
    Information,
    /// Something unexpected that did not stop the operation.
    Warning,
    /// A failure of the current operation.
    Error,
    /// A failure that leaves the application unable to continue.
    Critical,
}

impl LogLevel {
    /// Every level, ordered from lowest to highest severity.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// The persisted string name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
        }
    }

    /// Resolves a configuration ordinal (0 = `Trace` .. 5 = `Critical`).
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(LogLevel::Trace),
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Information),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Error),
            5 => Some(LogLevel::Critical),
            _ => None,
        }
    }

    /// Whether this level holds the zero value (`Trace`).
    ///
    /// Used as a serde `skip_serializing_if` predicate so default-valued
    /// level fields are omitted from the persisted document.
    pub fn is_default(&self) -> bool {
        *self == LogLevel::Trace
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn ordinals_resolve_in_range_only() {
        assert_eq!(LogLevel::from_ordinal(0), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_ordinal(4), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_ordinal(6), None);
        assert_eq!(LogLevel::from_ordinal(-1), None);
    }

    #[test]
    fn levels_serialize_as_names() {
        let value = bson::ser::serialize_to_bson(&LogLevel::Warning).unwrap();
        assert_eq!(value, bson::Bson::String("Warning".to_string()));
    }
}
