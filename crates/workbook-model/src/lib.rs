//! Workbook Document Model
//!
//! Typed schema of the project workbook plus everything needed to operate on
//! snapshots produced by other members' copies.
//!
//! # Core Concepts
//!
//! - [`Document`]: the root aggregate (metadata, team, six phases)
//! - [`hydrate`]: per-section defaulting of partial or old snapshots
//! - [`Identified`]: key, merge policy and section declared per entity type
//! - [`IdGenerator`]: swappable best-effort unique identifiers
//! - [`is_editable`]: advisory role-gated editing table
//!
//! # Example
//!
//! ```rust,ignore
//! use workbook_model::{parse_document, Document, UlidGenerator};
//!
//! let defaults = Document::create(&UlidGenerator, 0);
//! let document = parse_document(&text, &defaults)?;
//! println!("{} members", document.members.len());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod access;
pub mod catalog;
mod costing;
mod document;
mod error;
mod hydrate;
mod id;
mod lenient;
mod policy;
mod progress;
mod role;
mod sample;
mod setup;

// Re-exports
pub use access::{allowed_roles, is_editable, is_editable_by, Section};
pub use document::{
    now_millis, AuthorMeta, BusinessCanvas, Costing, Dish, DishCategory, Document, Evaluation,
    IndividualChecklist, Ingredient, Member, Phase1, Phase2, Phase3, Phase4, Phase5, Phase6,
    ProjectMeta, TimelineEvent, Trend,
};
pub use error::ModelError;
pub use hydrate::{hydrate, hydrate_or_default, is_recognizable, parse_document};
pub use id::{IdGenerator, IdStrategy, UlidGenerator, UuidV4Generator};
pub use policy::{dedupe_by_key, Identified, PolicyKind, Presence, Timestamped};
pub use progress::{progress_for, TaskProgress};
pub use role::{Role, RoleDefinition};
pub use setup::{MemberDraft, TeamSetup};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
