//! Workbook Store
//!
//! The working session and everything around it: single-slot persistence
//! with ordered background saves, import/export of exchange files and the
//! TOML configuration.
//!
//! # Core Concepts
//!
//! - [`Session`]: owns the working document; mutations replace it and save
//! - [`DocumentStore`]: async single-slot storage ([`FileStore`], [`MemoryStore`])
//! - [`Persister`]: fire-and-forget saves applied in request order
//! - [`WorkbookConfig`]: data directory, slot, id generator, log level
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use workbook_store::{Session, WorkbookConfig};
//!
//! let config = WorkbookConfig::load("workbook.toml")?;
//! let mut session = Session::open(Arc::new(config.file_store()), config.ids.generator()).await?;
//! let report = session.import_file("aporte_Luis.json").await?;
//! session.flush().await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod session;
mod store;
mod writer;

// Re-exports
pub use config::{WorkbookConfig, CONFIG_FILE};
pub use error::{ConfigError, StoreError};
pub use session::{export_file_name, Session};
pub use store::{DocumentStore, FileStore, MemoryStore};
pub use writer::Persister;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
