//! Convenient re-exports of commonly used types from loghub.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use loghub::prelude::*;
//! ```

pub use loghub_core::{
    error::{LogError, LogResult},
    hub::{LoggerHub, ServiceRegistry},
    level::LogLevel,
    logger::{Logger, Scope},
    options::{ConfigSection, LoggerOptions},
    query::{Expr, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
    record::{ErrorInfo, InnerErrorInfo, LogRecord},
};
