//! Export/import of one's own document must be lossless.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use workbook_model::{hydrate, parse_document, Document, Ingredient, UlidGenerator};
use workbook_test_utils::{arb_document, costing, document};

#[test]
fn sample_round_trips_through_json() {
    let doc = Document::sample(&UlidGenerator, 1_700_000_000_000);
    let text = doc.to_json().unwrap();

    let back = parse_document(&text, &Document::new("other")).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.fingerprint(), doc.fingerprint());
}

#[test]
fn pretty_and_compact_forms_hydrate_identically() {
    let doc = Document::sample(&UlidGenerator, 5);
    let defaults = Document::new("other");

    let compact = parse_document(&doc.to_json().unwrap(), &defaults).unwrap();
    let pretty = parse_document(&doc.to_json_pretty().unwrap(), &defaults).unwrap();
    assert_eq!(compact, pretty);
}

#[test]
fn legacy_snapshot_without_new_fields_loads() {
    // Written before group photos, checklists and costings existed.
    let legacy = r#"{
        "id": "old",
        "meta": { "teamName": "Old Team", "createdAt": 12 },
        "members": [{ "id": "m1", "name": "Ana", "role": "Coordinador" }],
        "phase1": { "justification": "because" },
        "phase2": { "trends": [] },
        "phase6": { "introduction": "intro" }
    }"#;

    let doc = parse_document(legacy, &Document::new("fresh")).unwrap();
    assert_eq!(doc.id, "old");
    assert_eq!(doc.meta.group_photo_base64, None);
    assert_eq!(doc.phase1.justification, "because");
    assert!(doc.phase5.costings.is_empty());
    assert!(doc.phase6.individual_checklists.is_empty());
    assert_eq!(doc.phase6.introduction, "intro");
}

#[test]
fn costing_amounts_survive_json_text() {
    let mut doc = document("p1", "Team");
    let mut sheet = costing("d1", "market");
    sheet.ingredients = vec![Ingredient {
        id: "i1".to_string(),
        name: "rice".to_string(),
        gross_weight: 1.7,
        price_per_unit: 3.19,
        waste_percentage: 12.5,
    }];
    sheet.total_cost = 1.7 * 3.19 * (1.0 - 12.5 / 100.0) / 3.0;
    sheet.multiplier = 0.1 + 0.2;
    doc.phase5.costings = vec![sheet];

    let back = parse_document(&doc.to_json().unwrap(), &Document::new("other")).unwrap();
    let (before, after) = (&doc.phase5.costings[0], &back.phase5.costings[0]);
    assert_eq!(after.total_cost.to_bits(), before.total_cost.to_bits());
    assert_eq!(after.multiplier.to_bits(), before.multiplier.to_bits());
    assert_eq!(back.fingerprint(), doc.fingerprint());
}

proptest! {
    #[test]
    fn prop_hydrate_of_serialized_is_identity(doc in arb_document()) {
        let value = serde_json::to_value(&doc).unwrap();
        let back = hydrate(&value, &Document::new("unused")).unwrap();
        prop_assert_eq!(&back, &doc);
        prop_assert_eq!(back.fingerprint(), doc.fingerprint());
    }

    #[test]
    fn prop_parse_of_exported_text_is_identity(doc in arb_document()) {
        let back = parse_document(&doc.to_json().unwrap(), &Document::new("unused")).unwrap();
        prop_assert_eq!(back.fingerprint(), doc.fingerprint());
        prop_assert_eq!(back, doc);
    }
}
