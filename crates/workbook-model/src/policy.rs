//! Merge metadata declared by the document model
//!
//! Each identity-bearing entity states its key, the merge policy that applies
//! to its collection and the section whose (advisory) write restriction it
//! falls under. The merge engine reads these declarations; it never infers a
//! policy from the data.

use crate::access::{self, Section};
use crate::document::{
    BusinessCanvas, Costing, Dish, Evaluation, Member, TimelineEvent, Trend,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Conflict policy for one field or collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// New keys appended; existing local entries never overwritten
    AppendOnlyDedupe,

    /// Imported entry overwrites local entry with the same key
    UpsertByKey,

    /// Whole object replaced when imported timestamp is strictly greater
    LastWriterWinsObject,

    /// Imported value copied only when present (non-empty)
    NonEmptyOverlay,

    /// Never taken from the import
    LocalOnly,
}

impl PolicyKind {
    /// Stable policy name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AppendOnlyDedupe => "append-only-dedupe",
            Self::UpsertByKey => "upsert-by-key",
            Self::LastWriterWinsObject => "last-writer-wins-object",
            Self::NonEmptyOverlay => "non-empty-overlay",
            Self::LocalOnly => "local-only",
        }
    }

    /// Which side wins when both sides hold the same identity
    #[must_use]
    pub fn winner_on_conflict(self) -> &'static str {
        match self {
            Self::AppendOnlyDedupe | Self::LocalOnly => "local",
            Self::UpsertByKey => "imported",
            Self::LastWriterWinsObject => "later timestamp",
            Self::NonEmptyOverlay => "imported when non-empty",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entity with a stable identity inside its collection
pub trait Identified {
    /// Identity type
    type Key: Clone + Eq + Hash + fmt::Debug;

    /// JSON field(s) holding the identity
    const KEY_FIELD: &'static str;

    /// Collection merge policy
    const POLICY: PolicyKind;

    /// Section governing who may edit the entity
    const SECTION: Section;

    /// Identity of this entity
    fn key(&self) -> Self::Key;

    /// Whether only some roles may edit this entity (advisory)
    #[must_use]
    fn role_restricted() -> bool {
        access::is_restricted(Self::SECTION)
    }
}

impl Identified for Member {
    type Key = String;
    const KEY_FIELD: &'static str = "id";
    const POLICY: PolicyKind = PolicyKind::AppendOnlyDedupe;
    const SECTION: Section = Section::Team;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Identified for Trend {
    type Key = String;
    const KEY_FIELD: &'static str = "id";
    const POLICY: PolicyKind = PolicyKind::AppendOnlyDedupe;
    const SECTION: Section = Section::Trends;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Identified for Dish {
    type Key = String;
    const KEY_FIELD: &'static str = "id";
    const POLICY: PolicyKind = PolicyKind::UpsertByKey;
    const SECTION: Section = Section::Dishes;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Identified for TimelineEvent {
    type Key = String;
    const KEY_FIELD: &'static str = "id";
    const POLICY: PolicyKind = PolicyKind::UpsertByKey;
    const SECTION: Section = Section::Timeline;

    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Identified for Costing {
    type Key = String;
    const KEY_FIELD: &'static str = "dishId";
    const POLICY: PolicyKind = PolicyKind::UpsertByKey;
    const SECTION: Section = Section::Costings;

    fn key(&self) -> String {
        self.dish_id.clone()
    }
}

impl Identified for Evaluation {
    /// (evaluator, target) pair; a tuple so no separator can make two pairs collide
    type Key = (String, String);
    const KEY_FIELD: &'static str = "evaluator+targetMember";
    const POLICY: PolicyKind = PolicyKind::UpsertByKey;
    const SECTION: Section = Section::Evaluations;

    fn key(&self) -> (String, String) {
        (self.evaluator.clone(), self.target_member.clone())
    }
}

/// Singleton object carrying its own last-write timestamp
pub trait Timestamped {
    /// Last-write time; 0 when never stamped
    fn timestamp(&self) -> i64;
}

impl Timestamped for BusinessCanvas {
    fn timestamp(&self) -> i64 {
        self.updated_by.as_ref().map_or(0, |meta| meta.timestamp)
    }
}

/// Explicit "did this side actually write something" rule
///
/// Text is present when non-empty; an option when it holds a present value.
/// Numbers and booleans deliberately have no implementation.
pub trait Presence {
    /// Whether the value counts as written
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

/// Keep the first entry of every identity, preserving order
///
/// Returns the number of dropped duplicates.
pub fn dedupe_by_key<T: Identified>(items: &mut Vec<T>) -> usize {
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    items.retain(|item| seen.insert(item.key()));
    before - items.len()
}
