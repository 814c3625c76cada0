//! MongoDB logging backend for loghub.
//!
//! This crate persists structured log records to a MongoDB collection,
//! provisioning the collection on demand (optionally capped) and exposing a
//! typed query API over what was written.
//!
//! # Connection
//!
//! The adapter is configured with a connection URL of the form
//! `mongodb://host:port/DatabaseName`; the database name segment is required.
//! Options come from code or from the `loghub.mongodb` section of the hosting
//! configuration, never both on one instance.
//!
//! # Example
//!
//! ```ignore
//! use loghub_mongodb::{MongoLogger, MongoLoggerOptions};
//! use loghub_core::level::LogLevel;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logger = MongoLogger::with(|options| {
//!         options.database_url = Some("mongodb://localhost:27017/observability".into());
//!         options.collection_name = "audit".into();
//!     })
//!     .await?;
//!
//!     logger.information("service started", None).await?;
//!
//!     let recent = logger.logs::<String>().limit(10).collect().await?;
//!     println!("{recent:?}");
//!
//!     logger.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! Synchronous callers use the mirror API in [`blocking`].

#[allow(unused_extern_crates)]
extern crate self as loghub_mongodb;

pub mod blocking;
pub mod context;
pub mod hub;
pub mod logger;
pub mod options;
pub mod query;

pub use context::MongoLogContext;
pub use hub::MongoLoggerHubExt;
pub use logger::{LogFinder, MongoLogger};
pub use options::{CONFIG_SECTION, MongoLoggerOptions};
