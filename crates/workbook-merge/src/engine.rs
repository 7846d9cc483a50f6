//! Document merge
//!
//! [`merge_documents`] is pure: both inputs are borrowed and the merged
//! document is a fresh value. Each field is merged on its own under the
//! policy listed in [`PolicyRegistry::workbook`](crate::PolicyRegistry::workbook).

use crate::error::MergeError;
use crate::policy::{merge_collection, AppendOnlyDedupe, LastWriterWins, NonEmptyOverlay};
use crate::report::MergeReport;
use serde_json::Value;
use workbook_model::{hydrate, is_recognizable, Document, Identified, PolicyKind, Presence};

/// Merged document plus what changed
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Document,
    pub report: MergeReport,
}

/// Merge `imported` into `local`
///
/// Local-only fields (`id`, project identity, gastronomic zone, delivery
/// flags) are carried over from `local` unchanged.
#[must_use]
pub fn merge_documents(local: &Document, imported: &Document) -> MergeOutcome {
    let mut merged = local.clone();
    let mut report = MergeReport::new(imported.meta.team_name.as_str(), imported.id.as_str());

    // Project media
    overlay(
        &mut report,
        "meta.logoBase64",
        &mut merged.meta.logo_base64,
        &imported.meta.logo_base64,
    );
    overlay(
        &mut report,
        "meta.groupPhotoBase64",
        &mut merged.meta.group_photo_base64,
        &imported.meta.group_photo_base64,
    );

    merged.members = collection(&mut report, "members", &local.members, &imported.members);

    // Phase 1
    overlay_attributed(
        &mut report,
        "phase1.justification",
        (&mut merged.phase1.justification, &mut merged.phase1.justification_meta),
        (&imported.phase1.justification, &imported.phase1.justification_meta),
    );
    overlay(
        &mut report,
        "phase1.targetAudience",
        &mut merged.phase1.target_audience,
        &imported.phase1.target_audience,
    );

    // Phase 2
    merged.phase2.trends = collection(
        &mut report,
        "phase2.trends",
        &local.phase2.trends,
        &imported.phase2.trends,
    );
    let (canvas, outcome) = LastWriterWins.resolve(&local.phase2.canvas, &imported.phase2.canvas);
    merged.phase2.canvas = canvas;
    report.scalar("phase2.canvas", PolicyKind::LastWriterWinsObject, outcome);

    // Phase 3
    merged.phase3.dishes = collection(
        &mut report,
        "phase3.dishes",
        &local.phase3.dishes,
        &imported.phase3.dishes,
    );

    // Phase 4
    overlay_attributed(
        &mut report,
        "phase4.introText",
        (&mut merged.phase4.intro_text, &mut merged.phase4.intro_meta),
        (&imported.phase4.intro_text, &imported.phase4.intro_meta),
    );
    overlay_attributed(
        &mut report,
        "phase4.objectivesText",
        (&mut merged.phase4.objectives_text, &mut merged.phase4.objectives_meta),
        (&imported.phase4.objectives_text, &imported.phase4.objectives_meta),
    );
    merged.phase4.timeline = collection(
        &mut report,
        "phase4.timeline",
        &local.phase4.timeline,
        &imported.phase4.timeline,
    );

    // Phase 5
    merged.phase5.costings = collection(
        &mut report,
        "phase5.costings",
        &local.phase5.costings,
        &imported.phase5.costings,
    );

    // Phase 6
    let (checklists, stats) = AppendOnlyDedupe.merge_map(
        &local.phase6.individual_checklists,
        &imported.phase6.individual_checklists,
    );
    merged.phase6.individual_checklists = checklists;
    report.collection(
        "phase6.individualChecklists",
        PolicyKind::AppendOnlyDedupe,
        stats,
    );

    let (ours, theirs) = (&mut merged.phase6, &imported.phase6);
    overlay(&mut report, "phase6.introduction", &mut ours.introduction, &theirs.introduction);
    overlay(&mut report, "phase6.conclusions", &mut ours.conclusions, &theirs.conclusions);
    overlay(&mut report, "phase6.bibliography", &mut ours.bibliography, &theirs.bibliography);
    overlay(
        &mut report,
        "phase6.virtualMenuUrl",
        &mut ours.virtual_menu_url,
        &theirs.virtual_menu_url,
    );
    overlay(
        &mut report,
        "phase6.rehearsalDate",
        &mut ours.rehearsal_date,
        &theirs.rehearsal_date,
    );
    merged.phase6.evaluations = collection(
        &mut report,
        "phase6.evaluations",
        &local.phase6.evaluations,
        &imported.phase6.evaluations,
    );

    let totals = report.totals();
    tracing::info!(
        source_team = %report.source_team,
        appended = totals.appended,
        replaced = totals.replaced,
        ignored = totals.ignored,
        fields_taken = report.scalars_taken(),
        "merged imported snapshot"
    );

    MergeOutcome {
        document: merged,
        report,
    }
}

/// Hydrate a decoded snapshot and merge it into `local`
///
/// # Errors
/// [`MergeError::MissingMetadata`] when `raw` is not a workbook.
pub fn merge_value(local: &Document, raw: &Value) -> Result<MergeOutcome, MergeError> {
    if !is_recognizable(raw) {
        tracing::warn!("rejected import without project metadata");
        return Err(MergeError::MissingMetadata);
    }
    let imported = hydrate(raw, &Document::new(String::new()))?;
    Ok(merge_documents(local, &imported))
}

/// Decode, validate, hydrate and merge an imported file's bytes
///
/// Any failure aborts before merging; `local` is never modified.
///
/// # Errors
/// [`MergeError::Encoding`] for non-UTF-8 bytes, [`MergeError::Malformed`]
/// for invalid JSON, [`MergeError::MissingMetadata`] for JSON that is not a
/// workbook.
pub fn merge_raw(local: &Document, bytes: &[u8]) -> Result<MergeOutcome, MergeError> {
    let text = std::str::from_utf8(bytes)?;
    let raw: Value = serde_json::from_str(text).map_err(|err| {
        tracing::warn!(error = %err, "rejected import that is not JSON");
        MergeError::from(err)
    })?;
    merge_value(local, &raw)
}

fn collection<T>(report: &mut MergeReport, path: &'static str, local: &[T], imported: &[T]) -> Vec<T>
where
    T: Identified + Clone + PartialEq,
{
    let merged = merge_collection(local, imported);
    report.collection(path, T::POLICY, merged.stats);
    merged.items
}

fn overlay<T>(report: &mut MergeReport, path: &'static str, target: &mut T, imported: &T)
where
    T: Presence + Clone + PartialEq,
{
    let outcome = NonEmptyOverlay.apply(target, imported);
    report.scalar(path, PolicyKind::NonEmptyOverlay, outcome);
}

fn overlay_attributed<T, M>(
    report: &mut MergeReport,
    path: &'static str,
    (target, target_meta): (&mut T, &mut Option<M>),
    (imported, imported_meta): (&T, &Option<M>),
) where
    T: Presence + Clone + PartialEq,
    M: Clone,
{
    let outcome = NonEmptyOverlay.apply_attributed(target, target_meta, imported, imported_meta);
    report.scalar(path, PolicyKind::NonEmptyOverlay, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ScalarOutcome;
    use crate::report::FieldChange;
    use pretty_assertions::assert_eq;
    use workbook_model::{AuthorMeta, IndividualChecklist, Role};
    use workbook_test_utils::{author, canvas_at, document, evaluation, scenario_import, scenario_local};

    #[test]
    fn two_member_scenario() {
        let outcome = merge_documents(&scenario_local(), &scenario_import());
        let doc = &outcome.document;

        let members: Vec<&str> = doc.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["Ana", "Luis"]);
        assert_eq!(doc.phase2.trends.len(), 1);
        let dishes: Vec<&str> = doc.phase3.dishes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(dishes, vec!["Cream Soup", "Salad"]);

        assert_eq!(doc.id, "p1");
        assert_eq!(doc.meta.team_name, "Local");
        assert_eq!(outcome.report.source_team, "Imported");
    }

    #[test]
    fn inputs_are_untouched() {
        let local = scenario_local();
        let imported = scenario_import();
        let (before_local, before_imported) = (local.fingerprint(), imported.fingerprint());

        let _ = merge_documents(&local, &imported);
        assert_eq!(local.fingerprint(), before_local);
        assert_eq!(imported.fingerprint(), before_imported);
    }

    #[test]
    fn narrative_meta_travels_with_text() {
        let mut local = document("p1", "L");
        local.phase4.intro_text = "foo".to_string();
        local.phase4.intro_meta = Some(author("Ana", Role::Coordinator, 1));

        let mut imported = document("p1", "I");
        imported.phase4.intro_text = "bar".to_string();
        imported.phase4.intro_meta = Some(author("Luis", Role::Documentation, 2));
        imported.phase1.justification = String::new();

        let outcome = merge_documents(&local, &imported);
        assert_eq!(outcome.document.phase4.intro_text, "bar");
        assert_eq!(
            outcome.document.phase4.intro_meta.as_ref().map(|m| m.author.as_str()),
            Some("Luis")
        );
        assert_eq!(
            outcome.report.field("phase4.introText").map(|f| f.change),
            Some(FieldChange::Scalar {
                outcome: ScalarOutcome::TookImported
            })
        );
    }

    #[test]
    fn empty_import_keeps_text() {
        let mut local = document("p1", "L");
        local.phase6.conclusions = "done".to_string();
        local.meta.logo_base64 = Some("data:image/png;base64,AAAA".to_string());

        let outcome = merge_documents(&local, &document("p1", "I"));
        assert_eq!(outcome.document.phase6.conclusions, "done");
        assert!(outcome.document.meta.logo_base64.is_some());
    }

    #[test]
    fn canvas_follows_timestamp() {
        let mut local = document("p1", "L");
        local.phase2.canvas = canvas_at("local", 100);

        let mut older = document("p1", "I");
        older.phase2.canvas = canvas_at("older", 50);
        assert_eq!(merge_documents(&local, &older).document.phase2.canvas.value_prop, "local");

        let mut newer = document("p1", "I");
        newer.phase2.canvas = canvas_at("newer", 150);
        assert_eq!(merge_documents(&local, &newer).document.phase2.canvas.value_prop, "newer");
    }

    #[test]
    fn checklists_keep_local_entry() {
        let mine = IndividualChecklist {
            reviewed_research: true,
            ..IndividualChecklist::default()
        };
        let mut local = document("p1", "L");
        local.phase6.individual_checklists.insert("m1".to_string(), mine);

        let mut imported = document("p1", "I");
        imported
            .phase6
            .individual_checklists
            .insert("m1".to_string(), IndividualChecklist::default());
        imported
            .phase6
            .individual_checklists
            .insert("m2".to_string(), IndividualChecklist::default());

        let merged = merge_documents(&local, &imported).document;
        assert_eq!(merged.phase6.individual_checklists.len(), 2);
        assert_eq!(merged.phase6.individual_checklists["m1"], mine);
    }

    #[test]
    fn evaluations_upsert_on_pair() {
        let mut local = document("p1", "L");
        local.phase6.evaluations = vec![evaluation("m1", "m2", 0)];
        let mut imported = document("p1", "I");
        imported.phase6.evaluations = vec![evaluation("m1", "m2", 1), evaluation("m2", "m1", -1)];

        let merged = merge_documents(&local, &imported).document;
        assert_eq!(merged.phase6.evaluations.len(), 2);
        assert_eq!(merged.phase6.evaluations[0].score, 1);
    }

    #[test]
    fn local_only_fields_survive() {
        let mut local = document("p1", "L");
        local.phase1.gastronomic_zone = "Valencia".to_string();
        local.phase6.presentation_uploaded = true;

        let mut imported = document("p2", "I");
        imported.phase1.gastronomic_zone = "Galicia".to_string();

        let merged = merge_documents(&local, &imported).document;
        assert_eq!(merged.id, "p1");
        assert_eq!(merged.phase1.gastronomic_zone, "Valencia");
        assert!(merged.phase6.presentation_uploaded);
    }

    #[test]
    fn raw_rejections() {
        let local = scenario_local();

        assert!(matches!(merge_raw(&local, &[0xff, 0xfe]), Err(MergeError::Encoding(_))));
        assert!(matches!(merge_raw(&local, b"{ not json"), Err(MergeError::Malformed(_))));
        assert!(matches!(merge_raw(&local, b"[1, 2]"), Err(MergeError::MissingMetadata)));
        assert!(matches!(
            merge_raw(&local, br#"{"members": []}"#),
            Err(MergeError::MissingMetadata)
        ));
        assert!(matches!(
            merge_raw(&local, br#"{"meta": "text"}"#),
            Err(MergeError::MissingMetadata)
        ));
    }

    #[test]
    fn raw_partial_snapshot_merges() {
        let local = scenario_local();
        let bytes = br#"{
            "meta": {"teamName": "Old"},
            "phase3": {"dishes": [{"id": "d9", "name": "Flan", "category": "Postre"}]}
        }"#;

        let outcome = merge_raw(&local, bytes).unwrap();
        assert_eq!(outcome.document.phase3.dishes.len(), 2);
        assert_eq!(outcome.document.members, local.members);
        assert_eq!(outcome.report.source_team, "Old");
    }

    #[test]
    fn anonymous_meta_is_not_special() {
        let mut imported = document("p1", "I");
        imported.phase1.justification = "why".to_string();
        imported.phase1.justification_meta = Some(AuthorMeta::default());

        let merged = merge_documents(&document("p1", "L"), &imported).document;
        assert_eq!(merged.phase1.justification, "why");
        assert!(merged.phase1.justification_meta.is_some());
    }
}
