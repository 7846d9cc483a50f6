//! Identity generation
//!
//! Every entity created offline gets an identifier so that independent copies
//! can later be correlated by identity rather than by position.
//!
//! Identifiers are best-effort unique tokens. Generators never coordinate
//! (no shared sequence, no network) and collisions are never detected: a
//! collision would make the merge treat two unrelated entities as one. At the
//! scale of a workbook (tens of entities, a handful of editors) the residual
//! probability is negligible for both generators below, but it is not zero and
//! nothing downstream guards against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;
use uuid::Uuid;

/// Source of new entity identifiers
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Produce a fresh identifier
    fn new_id(&self) -> String;
}

/// ULID generator: 48-bit millisecond timestamp plus 80 random bits
///
/// Identifiers sort by creation time, which keeps exported snapshots readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn new_id(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Random UUID v4 generator: 122 random bits
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Configurable choice of generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// [`UlidGenerator`]
    #[default]
    Ulid,
    /// [`UuidV4Generator`]
    Uuid,
}

impl IdStrategy {
    /// Build the generator for this strategy
    #[must_use]
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            Self::Ulid => Box::new(UlidGenerator),
            Self::Uuid => Box::new(UuidV4Generator),
        }
    }
}
