//! Field policy registry
//!
//! Provides [`PolicyRegistry`], the table of every document field path and
//! the policy the engine applies to it.

use indexmap::IndexMap;
use serde::Serialize;
use workbook_model::{
    Costing, Dish, Evaluation, Identified, Member, PolicyKind, TimelineEvent, Trend,
};

/// Policy attached to one field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldPolicy {
    /// JSON path, e.g. `phase3.dishes`
    pub path: &'static str,
    /// Applied policy
    pub kind: PolicyKind,
    /// Identity field for keyed collections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'static str>,
}

/// Registry of field policies, in document order
#[derive(Debug, Default, Clone)]
pub struct PolicyRegistry {
    fields: IndexMap<&'static str, FieldPolicy>,
}

impl PolicyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Registry for the workbook document
    #[must_use]
    pub fn workbook() -> Self {
        let mut registry = Self::new();

        registry.register("id", PolicyKind::LocalOnly);
        registry.register("meta.teamName", PolicyKind::LocalOnly);
        registry.register("meta.centerName", PolicyKind::LocalOnly);
        registry.register("meta.groupNumber", PolicyKind::LocalOnly);
        registry.register("meta.projectName", PolicyKind::LocalOnly);
        registry.register("meta.deliveryDate", PolicyKind::LocalOnly);
        registry.register("meta.createdAt", PolicyKind::LocalOnly);
        registry.register("meta.logoBase64", PolicyKind::NonEmptyOverlay);
        registry.register("meta.groupPhotoBase64", PolicyKind::NonEmptyOverlay);
        registry.register_collection::<Member>("members");

        registry.register("phase1.justification", PolicyKind::NonEmptyOverlay);
        registry.register("phase1.targetAudience", PolicyKind::NonEmptyOverlay);
        registry.register("phase1.gastronomicZone", PolicyKind::LocalOnly);

        registry.register_collection::<Trend>("phase2.trends");
        registry.register("phase2.canvas", PolicyKind::LastWriterWinsObject);

        registry.register_collection::<Dish>("phase3.dishes");

        registry.register("phase4.introText", PolicyKind::NonEmptyOverlay);
        registry.register("phase4.objectivesText", PolicyKind::NonEmptyOverlay);
        registry.register_collection::<TimelineEvent>("phase4.timeline");

        registry.register_collection::<Costing>("phase5.costings");

        registry.fields.insert(
            "phase6.individualChecklists",
            FieldPolicy {
                path: "phase6.individualChecklists",
                kind: PolicyKind::AppendOnlyDedupe,
                key: Some("memberId"),
            },
        );
        registry.register("phase6.introduction", PolicyKind::NonEmptyOverlay);
        registry.register("phase6.conclusions", PolicyKind::NonEmptyOverlay);
        registry.register("phase6.bibliography", PolicyKind::NonEmptyOverlay);
        registry.register("phase6.memoryPdfUploaded", PolicyKind::LocalOnly);
        registry.register("phase6.presentationUploaded", PolicyKind::LocalOnly);
        registry.register("phase6.virtualMenuUrl", PolicyKind::NonEmptyOverlay);
        registry.register("phase6.physicalMenuUploaded", PolicyKind::LocalOnly);
        registry.register("phase6.rehearsalDate", PolicyKind::NonEmptyOverlay);
        registry.register_collection::<Evaluation>("phase6.evaluations");

        registry
    }

    /// Register a scalar or object field
    pub fn register(&mut self, path: &'static str, kind: PolicyKind) {
        self.fields.insert(path, FieldPolicy { path, kind, key: None });
    }

    /// Register a keyed collection under the policy its entity declares
    pub fn register_collection<T: Identified>(&mut self, path: &'static str) {
        self.fields.insert(
            path,
            FieldPolicy {
                path,
                kind: T::POLICY,
                key: Some(T::KEY_FIELD),
            },
        );
    }

    /// Policy for a path
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FieldPolicy> {
        self.fields.get(path)
    }

    /// Policy kind for a path, local-only when unknown
    #[must_use]
    pub fn kind_of(&self, path: &str) -> PolicyKind {
        self.get(path).map_or(PolicyKind::LocalOnly, |field| field.kind)
    }

    /// All fields in document order
    pub fn iter(&self) -> impl Iterator<Item = &FieldPolicy> {
        self.fields.values()
    }

    /// Fields the import can change
    pub fn merged(&self) -> impl Iterator<Item = &FieldPolicy> {
        self.iter().filter(|field| field.kind != PolicyKind::LocalOnly)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_registry_covers_collections() {
        let registry = PolicyRegistry::workbook();
        assert_eq!(registry.kind_of("members"), PolicyKind::AppendOnlyDedupe);
        assert_eq!(registry.kind_of("phase2.trends"), PolicyKind::AppendOnlyDedupe);
        assert_eq!(registry.kind_of("phase3.dishes"), PolicyKind::UpsertByKey);
        assert_eq!(registry.kind_of("phase4.timeline"), PolicyKind::UpsertByKey);
        assert_eq!(registry.kind_of("phase5.costings"), PolicyKind::UpsertByKey);
        assert_eq!(registry.kind_of("phase6.evaluations"), PolicyKind::UpsertByKey);
        assert_eq!(registry.get("phase5.costings").unwrap().key, Some("dishId"));
    }

    #[test]
    fn workbook_registry_scalars() {
        let registry = PolicyRegistry::workbook();
        assert_eq!(registry.kind_of("phase2.canvas"), PolicyKind::LastWriterWinsObject);
        assert_eq!(registry.kind_of("phase4.introText"), PolicyKind::NonEmptyOverlay);
        assert_eq!(registry.kind_of("meta.logoBase64"), PolicyKind::NonEmptyOverlay);
        assert_eq!(registry.kind_of("phase1.gastronomicZone"), PolicyKind::LocalOnly);
        assert_eq!(registry.kind_of("no.such.field"), PolicyKind::LocalOnly);
    }

    #[test]
    fn registry_keeps_document_order() {
        let registry = PolicyRegistry::workbook();
        let paths: Vec<&str> = registry.iter().map(|f| f.path).collect();
        assert_eq!(paths.first(), Some(&"id"));
        assert_eq!(paths.last(), Some(&"phase6.evaluations"));
        assert!(registry.merged().all(|f| f.kind != PolicyKind::LocalOnly));
    }

    #[test]
    fn empty_registry() {
        let mut registry = PolicyRegistry::new();
        assert!(registry.is_empty());
        registry.register("x", PolicyKind::LocalOnly);
        assert_eq!(registry.len(), 1);
    }
}
