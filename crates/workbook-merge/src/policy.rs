//! Merge policies and their outcome types
//!
//! Each policy is a small, independent rule. The engine applies one per
//! field; the rules are intentionally not unified (collections keyed by
//! identity favour the import, append-only ones favour the local copy,
//! narrative text favours whichever side wrote something, and only the canvas
//! compares timestamps).

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use workbook_model::{Identified, PolicyKind, Presence, Timestamped};

/// Rule for merging two keyed collections
pub trait CollectionPolicy: Send + Sync + fmt::Debug {
    /// Merge `imported` into `local` without touching either
    ///
    /// Result order: local entries first (in local order), then entries
    /// with new keys in imported order.
    fn merge<T>(&self, local: &[T], imported: &[T]) -> CollectionMerge<T>
    where
        T: Identified + Clone + PartialEq;

    /// Policy implemented
    fn kind(&self) -> PolicyKind;

    /// Policy name (for reports)
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Merged collection with per-entry accounting
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionMerge<T> {
    /// Resulting entries
    pub items: Vec<T>,
    /// What happened to imported entries
    pub stats: MergeStats,
}

/// Accounting of imported entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeStats {
    /// New identity, added
    pub appended: usize,
    /// Existing identity, overwritten with a different value
    pub replaced: usize,
    /// Existing identity, identical on both sides
    pub unchanged: usize,
    /// Existing identity, local copy kept
    pub ignored: usize,
}

impl MergeStats {
    /// Whether the merge altered the collection
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.appended > 0 || self.replaced > 0
    }

    /// Total imported entries seen
    #[inline]
    #[must_use]
    pub fn seen(&self) -> usize {
        self.appended + self.replaced + self.unchanged + self.ignored
    }
}

/// Add entries whose identity is new; never overwrite local entries
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendOnlyDedupe;

impl AppendOnlyDedupe {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Same rule over an identity-keyed map
    #[must_use]
    pub fn merge_map<K, V>(
        &self,
        local: &IndexMap<K, V>,
        imported: &IndexMap<K, V>,
    ) -> (IndexMap<K, V>, MergeStats)
    where
        K: Clone + Eq + Hash,
        V: Clone + PartialEq,
    {
        let mut merged = local.clone();
        let mut stats = MergeStats::default();

        for (key, value) in imported {
            match merged.get(key) {
                Some(existing) if existing == value => stats.unchanged += 1,
                Some(_) => stats.ignored += 1,
                None => {
                    merged.insert(key.clone(), value.clone());
                    stats.appended += 1;
                }
            }
        }

        (merged, stats)
    }
}

impl CollectionPolicy for AppendOnlyDedupe {
    fn merge<T>(&self, local: &[T], imported: &[T]) -> CollectionMerge<T>
    where
        T: Identified + Clone + PartialEq,
    {
        let mut known: IndexMap<T::Key, usize> = local
            .iter()
            .enumerate()
            .map(|(index, item)| (item.key(), index))
            .collect();
        let mut items = local.to_vec();
        let mut stats = MergeStats::default();

        for item in imported {
            match known.get(&item.key()) {
                Some(&index) if items[index] == *item => stats.unchanged += 1,
                Some(_) => stats.ignored += 1,
                None => {
                    known.insert(item.key(), items.len());
                    items.push(item.clone());
                    stats.appended += 1;
                }
            }
        }

        CollectionMerge { items, stats }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::AppendOnlyDedupe
    }
}

/// Imported entry overwrites the local entry with the same key
///
/// No timestamp comparison happens at this layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpsertByKey;

impl UpsertByKey {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CollectionPolicy for UpsertByKey {
    fn merge<T>(&self, local: &[T], imported: &[T]) -> CollectionMerge<T>
    where
        T: Identified + Clone + PartialEq,
    {
        let mut by_key: IndexMap<T::Key, T> = local
            .iter()
            .map(|item| (item.key(), item.clone()))
            .collect();
        let mut stats = MergeStats::default();

        for item in imported {
            match by_key.insert(item.key(), item.clone()) {
                None => stats.appended += 1,
                Some(previous) if previous == *item => stats.unchanged += 1,
                Some(_) => stats.replaced += 1,
            }
        }

        CollectionMerge {
            items: by_key.into_values().collect(),
            stats,
        }
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::UpsertByKey
    }
}

/// Merge a collection under the policy its entity type declares
///
/// Object-level kinds make no sense for a collection; they degrade to keeping
/// the local collection untouched.
#[must_use]
pub fn merge_collection<T>(local: &[T], imported: &[T]) -> CollectionMerge<T>
where
    T: Identified + Clone + PartialEq,
{
    match T::POLICY {
        PolicyKind::AppendOnlyDedupe => AppendOnlyDedupe.merge(local, imported),
        PolicyKind::UpsertByKey => UpsertByKey.merge(local, imported),
        other => {
            tracing::error!(policy = %other, key = T::KEY_FIELD, "not a collection policy; keeping local");
            CollectionMerge {
                items: local.to_vec(),
                stats: MergeStats {
                    ignored: imported.len(),
                    ..MergeStats::default()
                },
            }
        }
    }
}

/// Result of a single-value rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarOutcome {
    /// Import had nothing to offer (absent, empty or older)
    KeptLocal,
    /// Import won and differed from local
    TookImported,
    /// Import would have won but was identical
    Unchanged,
}

impl ScalarOutcome {
    /// Whether the merged value differs from local
    #[inline]
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::TookImported)
    }
}

/// Copy the imported value only when it is present
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyOverlay;

impl NonEmptyOverlay {
    /// Apply to `target`; absent or empty imports never erase local content
    pub fn apply<T>(&self, target: &mut T, imported: &T) -> ScalarOutcome
    where
        T: Presence + Clone + PartialEq,
    {
        if !imported.is_present() {
            ScalarOutcome::KeptLocal
        } else if target == imported {
            ScalarOutcome::Unchanged
        } else {
            *target = imported.clone();
            ScalarOutcome::TookImported
        }
    }

    /// Apply to a text and carry its attribution along when the import wins
    pub fn apply_attributed<T, M>(
        &self,
        target: &mut T,
        target_meta: &mut Option<M>,
        imported: &T,
        imported_meta: &Option<M>,
    ) -> ScalarOutcome
    where
        T: Presence + Clone + PartialEq,
        M: Clone,
    {
        let outcome = self.apply(target, imported);
        if outcome == ScalarOutcome::TookImported && imported_meta.is_some() {
            target_meta.clone_from(imported_meta);
        }
        outcome
    }
}

/// Replace a whole object when the imported timestamp is strictly greater
///
/// Timestamps are device wall-clock milliseconds; skewed clocks can make an
/// intended latest edit lose. That gap is accepted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriterWins;

impl LastWriterWins {
    /// Pick the winning object
    #[must_use]
    pub fn resolve<T>(&self, local: &T, imported: &T) -> (T, ScalarOutcome)
    where
        T: Timestamped + Clone + PartialEq,
    {
        if imported.timestamp() <= local.timestamp() {
            (local.clone(), ScalarOutcome::KeptLocal)
        } else if imported == local {
            (local.clone(), ScalarOutcome::Unchanged)
        } else {
            (imported.clone(), ScalarOutcome::TookImported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use workbook_model::{Dish, Member, Role};
    use workbook_test_utils::{canvas_at, dish, member, trend};

    fn names(items: &[Dish]) -> Vec<&str> {
        items.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn append_only_never_overwrites() {
        let local = vec![trend("t1", "local")];
        let imported = vec![trend("t1", "imported"), trend("t2", "new")];

        let result = AppendOnlyDedupe.merge(&local, &imported);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].title, "local");
        assert_eq!(result.items[1].id, "t2");
        assert_eq!(result.stats.appended, 1);
        assert_eq!(result.stats.ignored, 1);
    }

    #[test]
    fn append_only_keeps_imported_relative_order() {
        let local = vec![trend("t1", "a")];
        let imported = vec![trend("t9", "z"), trend("t1", "a"), trend("t3", "c")];

        let result = AppendOnlyDedupe.merge(&local, &imported);
        let ids: Vec<&str> = result.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t9", "t3"]);
        assert_eq!(result.stats.unchanged, 1);
    }

    #[test]
    fn append_only_dedupes_within_import() {
        let result = AppendOnlyDedupe.merge(&[], &[trend("t1", "first"), trend("t1", "second")]);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].title, "first");
    }

    #[test]
    fn upsert_imported_wins_on_collision() {
        let local = vec![dish("d1", "A"), dish("d2", "keep")];
        let imported = vec![dish("d1", "B"), dish("d3", "new")];

        let result = UpsertByKey.merge(&local, &imported);
        assert_eq!(names(&result.items), vec!["B", "keep", "new"]);
        assert_eq!(result.stats.replaced, 1);
        assert_eq!(result.stats.appended, 1);
        assert!(result.stats.changed());
    }

    #[test]
    fn upsert_identical_is_unchanged() {
        let local = vec![dish("d1", "A")];
        let result = UpsertByKey.merge(&local, &local);
        assert_eq!(result.items, local);
        assert_eq!(result.stats.unchanged, 1);
        assert!(!result.stats.changed());
    }

    #[test]
    fn merge_collection_follows_declared_policy() {
        let local = vec![member("m1", "Ana", Role::Coordinator)];
        let imported = vec![member("m1", "Renamed", Role::Production)];

        let result: CollectionMerge<Member> = merge_collection(&local, &imported);
        assert_eq!(result.items[0].name, "Ana");

        let result = merge_collection(&[dish("d1", "A")], &[dish("d1", "B")]);
        assert_eq!(result.items[0].name, "B");
    }

    #[test]
    fn append_only_map_keeps_local_values() {
        let local: IndexMap<&str, u8> = [("a", 1)].into_iter().collect();
        let imported: IndexMap<&str, u8> = [("a", 2), ("b", 3)].into_iter().collect();

        let (merged, stats) = AppendOnlyDedupe.merge_map(&local, &imported);
        assert_eq!(merged.get("a"), Some(&1));
        assert_eq!(merged.get("b"), Some(&3));
        assert_eq!(stats.appended, 1);
        assert_eq!(stats.ignored, 1);
    }

    #[test]
    fn overlay_skips_empty_imports() {
        let mut text = "foo".to_string();
        assert_eq!(NonEmptyOverlay.apply(&mut text, &String::new()), ScalarOutcome::KeptLocal);
        assert_eq!(text, "foo");

        assert_eq!(NonEmptyOverlay.apply(&mut text, &"bar".to_string()), ScalarOutcome::TookImported);
        assert_eq!(text, "bar");

        assert_eq!(NonEmptyOverlay.apply(&mut text, &"bar".to_string()), ScalarOutcome::Unchanged);
    }

    #[test]
    fn overlay_on_options() {
        let mut logo = Some("local".to_string());
        assert_eq!(NonEmptyOverlay.apply(&mut logo, &None), ScalarOutcome::KeptLocal);
        assert_eq!(logo.as_deref(), Some("local"));

        let mut logo = None;
        NonEmptyOverlay.apply(&mut logo, &Some("img".to_string()));
        assert_eq!(logo.as_deref(), Some("img"));
    }

    #[test]
    fn attributed_overlay_moves_meta_with_text() {
        let mut text = "old".to_string();
        let mut meta = Some(1);
        NonEmptyOverlay.apply_attributed(&mut text, &mut meta, &"new".to_string(), &Some(2));
        assert_eq!((text.as_str(), meta), ("new", Some(2)));

        // Import without attribution keeps the local one.
        let mut text = "old".to_string();
        let mut meta = Some(1);
        NonEmptyOverlay.apply_attributed(&mut text, &mut meta, &"new".to_string(), &None::<i32>);
        assert_eq!(meta, Some(1));

        // Empty import moves nothing.
        let mut text = "old".to_string();
        let mut meta = Some(1);
        NonEmptyOverlay.apply_attributed(&mut text, &mut meta, &String::new(), &Some(3));
        assert_eq!((text.as_str(), meta), ("old", Some(1)));
    }

    #[test]
    fn last_writer_wins_is_strict() {
        let local = canvas_at("local", 100);

        let (kept, outcome) = LastWriterWins.resolve(&local, &canvas_at("older", 50));
        assert_eq!(kept.value_prop, "local");
        assert_eq!(outcome, ScalarOutcome::KeptLocal);

        let (kept, _) = LastWriterWins.resolve(&local, &canvas_at("tie", 100));
        assert_eq!(kept.value_prop, "local");

        let (won, outcome) = LastWriterWins.resolve(&local, &canvas_at("newer", 150));
        assert_eq!(won.value_prop, "newer");
        assert!(outcome.changed());
    }

    #[test]
    fn policy_names() {
        assert_eq!(AppendOnlyDedupe.name(), "append-only-dedupe");
        assert_eq!(UpsertByKey.name(), "upsert-by-key");
    }
}
