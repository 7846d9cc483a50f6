//! Merge report
//!
//! What an import changed, field by field.

use crate::policy::{MergeStats, ScalarOutcome};
use serde::Serialize;
use std::fmt;
use workbook_model::PolicyKind;

/// Change to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldChange {
    /// Keyed collection accounting
    Collection(MergeStats),
    /// Single value outcome
    Scalar {
        /// What the rule decided
        outcome: ScalarOutcome,
    },
}

impl FieldChange {
    /// Whether the merged field differs from local
    #[must_use]
    pub fn changed(&self) -> bool {
        match self {
            Self::Collection(stats) => stats.changed(),
            Self::Scalar { outcome } => outcome.changed(),
        }
    }
}

/// Outcome for one field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOutcome {
    pub path: &'static str,
    pub policy: PolicyKind,
    pub change: FieldChange,
}

/// Everything one merge did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Team name carried by the imported snapshot
    pub source_team: String,
    /// Document id carried by the imported snapshot
    pub source_id: String,
    /// Per-field outcomes, in merge order
    pub fields: Vec<FieldOutcome>,
}

impl MergeReport {
    /// Create an empty report for an import
    #[inline]
    #[must_use]
    pub fn new(source_team: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            source_team: source_team.into(),
            source_id: source_id.into(),
            fields: Vec::new(),
        }
    }

    /// Record a collection result
    pub fn collection(&mut self, path: &'static str, policy: PolicyKind, stats: MergeStats) {
        tracing::debug!(
            path,
            %policy,
            appended = stats.appended,
            replaced = stats.replaced,
            ignored = stats.ignored,
            "merged collection"
        );
        self.fields.push(FieldOutcome {
            path,
            policy,
            change: FieldChange::Collection(stats),
        });
    }

    /// Record a scalar result
    pub fn scalar(&mut self, path: &'static str, policy: PolicyKind, outcome: ScalarOutcome) {
        tracing::debug!(path, %policy, ?outcome, "merged field");
        self.fields.push(FieldOutcome {
            path,
            policy,
            change: FieldChange::Scalar { outcome },
        });
    }

    /// Outcome for a path
    #[must_use]
    pub fn field(&self, path: &str) -> Option<&FieldOutcome> {
        self.fields.iter().find(|field| field.path == path)
    }

    /// Fields whose merged value differs from local
    pub fn changed(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.fields.iter().filter(|field| field.change.changed())
    }

    /// Whether the import changed anything at all
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changed().next().is_none()
    }

    /// Collection accounting summed over all fields
    #[must_use]
    pub fn totals(&self) -> MergeStats {
        self.fields
            .iter()
            .filter_map(|field| match field.change {
                FieldChange::Collection(stats) => Some(stats),
                FieldChange::Scalar { .. } => None,
            })
            .fold(MergeStats::default(), |acc, stats| MergeStats {
                appended: acc.appended + stats.appended,
                replaced: acc.replaced + stats.replaced,
                unchanged: acc.unchanged + stats.unchanged,
                ignored: acc.ignored + stats.ignored,
            })
    }

    /// Number of scalar fields taken from the import
    #[must_use]
    pub fn scalars_taken(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| matches!(field.change, FieldChange::Scalar { outcome } if outcome.changed()))
            .count()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.totals();
        let team = if self.source_team.is_empty() {
            "unnamed team"
        } else {
            self.source_team.as_str()
        };
        write!(
            f,
            "merged snapshot from {team}: {} added, {} replaced, {} kept local, {} fields taken",
            totals.appended,
            totals.replaced,
            totals.ignored,
            self.scalars_taken()
        )
    }
}
