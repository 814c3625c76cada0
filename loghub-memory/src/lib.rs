//! In-memory logging backend for loghub.
//!
//! This crate keeps log records in an insertion-ordered, optionally bounded
//! in-memory buffer behind an async-aware read-write lock. It is meant for
//! development, tests, and as a lightweight second backend on a hub that also
//! ships records to a persistent store.
//!
//! A bounded buffer mirrors capped-collection semantics: once `max_records`
//! is reached, the oldest entries are evicted as new ones arrive.
//!
//! # Quick Start
//!
//! ```ignore
//! use loghub_memory::MemoryLogger;
//! use loghub_core::{level::LogLevel, query::Query};
//!
//! let logger = MemoryLogger::new();
//! logger.write(LogLevel::Information, "service started", None).await?;
//!
//! let entries = logger.find(Query::new()).await?;
//! assert_eq!(entries.len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as loghub_memory;

pub mod evaluator;
pub mod logger;

pub use logger::{MemoryLogger, MemoryLoggerOptions};
