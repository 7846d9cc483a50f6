//! Snapshot hydration
//!
//! Turns an arbitrary decoded payload into a complete, shape-valid
//! [`Document`]. Every top-level section and every phase is defaulted on its
//! own: a missing `phase3` becomes the default one, a partial `phase3` keeps
//! its present fields and takes the rest from the defaults. The schema only
//! grows additively, so old snapshots keep loading without a version field.

use crate::document::Document;
use crate::error::ModelError;
use crate::lenient;
use crate::policy::dedupe_by_key;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Minimal validity check: an object carrying a `meta` object
#[must_use]
pub fn is_recognizable(raw: &Value) -> bool {
    raw.as_object()
        .and_then(|obj| obj.get("meta"))
        .is_some_and(Value::is_object)
}

/// Build a complete document from `raw`, defaulting from `defaults`
///
/// # Errors
/// [`ModelError::MissingMetadata`] when `raw` is not a recognizable
/// document. Callers must then fall back to a fresh document rather than
/// keep a partially broken structure.
pub fn hydrate(raw: &Value, defaults: &Document) -> Result<Document, ModelError> {
    let obj = match raw.as_object() {
        Some(obj) if obj.get("meta").is_some_and(Value::is_object) => obj,
        _ => return Err(ModelError::MissingMetadata),
    };

    let id = match obj.get("id") {
        Some(Value::String(id)) => id.clone(),
        _ => defaults.id.clone(),
    };

    let members = match obj.get("members") {
        None => defaults.members.clone(),
        Some(raw) => lenient::decode_items(Some(raw.clone()), "member"),
    };

    let mut document = Document {
        id,
        meta: section(obj, "meta", &defaults.meta),
        members,
        phase1: section(obj, "phase1", &defaults.phase1),
        phase2: section(obj, "phase2", &defaults.phase2),
        phase3: section(obj, "phase3", &defaults.phase3),
        phase4: section(obj, "phase4", &defaults.phase4),
        phase5: section(obj, "phase5", &defaults.phase5),
        phase6: section(obj, "phase6", &defaults.phase6),
    };

    let dropped = dedupe_by_key(&mut document.members)
        + dedupe_by_key(&mut document.phase2.trends)
        + dedupe_by_key(&mut document.phase3.dishes)
        + dedupe_by_key(&mut document.phase4.timeline)
        + dedupe_by_key(&mut document.phase5.costings)
        + dedupe_by_key(&mut document.phase6.evaluations);
    if dropped > 0 {
        tracing::warn!(dropped, "dropped entries with duplicate identity");
    }

    Ok(document)
}

/// Parse JSON text and hydrate it
///
/// # Errors
/// [`ModelError::Malformed`] for unparseable text, otherwise as [`hydrate`].
pub fn parse_document(text: &str, defaults: &Document) -> Result<Document, ModelError> {
    let raw: Value = serde_json::from_str(text).map_err(ModelError::malformed)?;
    hydrate(&raw, defaults)
}

/// Restore persisted state, silently resetting on corruption
///
/// Used on load: a missing slot or a corrupt payload yields `defaults`.
#[must_use]
pub fn hydrate_or_default(stored: Option<&str>, defaults: Document) -> Document {
    let Some(text) = stored else {
        return defaults;
    };
    match parse_document(text, &defaults) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(error = %err, "corrupt persisted state, starting fresh");
            defaults
        }
    }
}

/// Overlay the present fields of `raw[key]` on the serialized default section
///
/// Fields are taken one at a time. A field whose value does not decode is
/// reset to its default; the rest of the section is kept.
fn section<T>(obj: &Map<String, Value>, key: &str, default: &T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let fields = match obj.get(key) {
        None | Some(Value::Null) => return default.clone(),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            tracing::warn!(
                section = key,
                found = lenient::type_label(other),
                "expected object, using defaults"
            );
            return default.clone();
        }
    };

    let mut base = match serde_json::to_value(default) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (field, value) in fields {
        if value.is_null() {
            continue;
        }
        let previous = base.insert(field.clone(), value.clone());
        if let Err(err) = serde_json::from_value::<T>(Value::Object(base.clone())) {
            tracing::warn!(
                section = key,
                field = %field,
                error = %err,
                "undecodable field, using default"
            );
            match previous {
                Some(previous) => base.insert(field.clone(), previous),
                None => base.remove(field),
            };
        }
    }

    serde_json::from_value(Value::Object(base)).unwrap_or_else(|err| {
        tracing::warn!(section = key, error = %err, "undecodable section, using defaults");
        default.clone()
    })
}
