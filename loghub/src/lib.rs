//! Main loghub crate providing a pluggable logging layer over document
//! stores.
//!
//! This crate is the primary entry point for users of the loghub framework.
//! It re-exports the core abstractions and provides access to the bundled
//! backends.
//!
//! # Features
//!
//! - **Structured records** - Entries persist as documents with a stable,
//!   compact default shape, or any shape the caller encodes
//! - **Multiple backends** - One hub fans a log call out to every registered
//!   backend; in-memory and MongoDB backends ship with the project
//! - **Typed queries** - Read written records back as the types they were
//!   written with, filtered lazily
//!
//! # Quick Start
//!
//! ```ignore
//! use loghub::prelude::*;
//! use loghub::memory::MemoryLogger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let recent = MemoryLogger::bounded(1_000);
//!
//!     let mut hub = LoggerHub::new();
//!     hub.add_logger(Arc::new(recent.clone()));
//!
//!     hub.information(&"service started", None).await.unwrap();
//!
//!     let entries = recent.find(Query::new()).await.unwrap();
//!     assert_eq!(entries.len(), 1);
//! }
//! ```
//!
//! # MongoDB
//!
//! With the `mongodb` feature enabled, the MongoDB backend attaches to a hub
//! through its registration extension:
//!
//! ```ignore
//! use loghub::prelude::*;
//! use loghub::mongodb::MongoLoggerHubExt;
//!
//! let mut hub = LoggerHub::with_configuration(application_configuration);
//! hub.add_mongodb().await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory buffer for development, tests, and recent-entry
//!   views
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb`
//!   feature)

pub mod prelude;

pub use loghub_core::{error, hub, level, logger, options, query, record};

// Re-export BSON types for convenience
pub use bson;

/// In-memory backend implementations.
pub mod memory {
    pub use loghub_memory::{MemoryLogger, MemoryLoggerOptions};
}

/// MongoDB backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use loghub_mongodb::{
        CONFIG_SECTION, LogFinder, MongoLogContext, MongoLogger, MongoLoggerHubExt,
        MongoLoggerOptions, blocking,
    };
}
