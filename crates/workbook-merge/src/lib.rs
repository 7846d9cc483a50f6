//! Workbook Merge Engine
//!
//! Reconciles a member's local workbook with a snapshot exported from another
//! member's copy. There is no shared base version: every field is merged by a
//! fixed, deterministic policy.
//!
//! # Core Concepts
//!
//! - [`merge_documents`]: pure merge of two hydrated documents
//! - [`merge_raw`]: decode, validate and hydrate imported bytes, then merge
//! - [`CollectionPolicy`]: keyed collection rules ([`AppendOnlyDedupe`], [`UpsertByKey`])
//! - [`NonEmptyOverlay`] / [`LastWriterWins`]: single value rules
//! - [`PolicyRegistry`]: every field path and the policy applied to it
//! - [`MergeReport`]: per-field accounting of one merge
//!
//! # Example
//!
//! ```rust,ignore
//! use workbook_merge::merge_raw;
//!
//! let outcome = merge_raw(&local, &bytes)?;
//! println!("{}", outcome.report.summary());
//! let local = outcome.document;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod engine;
mod error;
mod policy;
mod registry;
mod report;

// Re-exports
pub use engine::{merge_documents, merge_raw, merge_value, MergeOutcome};
pub use error::MergeError;
pub use policy::{
    merge_collection, AppendOnlyDedupe, CollectionMerge, CollectionPolicy, LastWriterWins,
    MergeStats, NonEmptyOverlay, ScalarOutcome, UpsertByKey,
};
pub use registry::{FieldPolicy, PolicyRegistry};
pub use report::{FieldChange, FieldOutcome, MergeReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
