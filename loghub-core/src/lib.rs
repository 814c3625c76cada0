//! Backend-agnostic core of the loghub logging layer.
//!
//! loghub persists structured log records to document stores. This crate holds
//! everything the individual backends share:
//!
//! - **Log levels** ([`level`]) - The ordered severity scale accepted by every backend
//! - **Record model** ([`record`]) - The default persisted record shape and its error payload
//! - **Logger capability** ([`logger`]) - The object-safe trait every backend implements
//! - **Options contract** ([`options`]) - Shared option semantics and configuration lookup
//! - **Query and filtering API** ([`query`]) - Lazy query construction over stored records
//! - **Logging hub** ([`hub`]) - Fan-out of one log call to every registered backend
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use loghub_core::{hub::LoggerHub, level::LogLevel};
//!
//! let mut hub = LoggerHub::new();
//! hub.add_logger(my_backend);
//! hub.write(LogLevel::Information, &"service started", None).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as loghub_core;

pub mod error;
pub mod hub;
pub mod level;
pub mod logger;
pub mod options;
pub mod query;
pub mod record;
