//! Load-time schema migration for stored game documents.
//!
//! Documents written by earlier revisions of the board predate the `scores`,
//! `locked`, and `version` fields. Rather than presence-checking at every
//! read site, a raw stored record of unknown vintage passes through the
//! migration steps exactly once on load and comes out at the current schema.
//! Each step is pure and reports whether it changed anything, so callers
//! know to persist the upgraded record.

use serde_json::{json, Value};

use super::document::GameDocument;

/// A document recovered from the store, possibly upgraded on the way in
#[derive(Debug)]
pub struct Loaded {
    pub document: GameDocument,
    /// True when any migration step backfilled a missing field
    pub backfilled: bool,
}

/// Migration steps, applied in order of introduction
pub const MIGRATIONS: &[fn(&mut Value) -> bool] =
    &[backfill_scores, backfill_locked, backfill_version];

/// Bring a raw stored record up to the current schema and deserialize it
///
/// # Errors
///
/// Returns the deserialization error when the record still does not match
/// the current schema after migration (corrupt stored state).
pub fn load_document(mut raw: Value) -> Result<Loaded, serde_json::Error> {
    let mut backfilled = false;
    for step in MIGRATIONS {
        backfilled |= step(&mut raw);
    }

    let document = serde_json::from_value(raw)?;
    Ok(Loaded {
        document,
        backfilled,
    })
}

/// Backfill the per-quarter score table with empty entries
pub fn backfill_scores(raw: &mut Value) -> bool {
    insert_missing(raw, "scores", || {
        json!({
            "Q1": { "patriots": null, "seahawks": null },
            "Q2": { "patriots": null, "seahawks": null },
            "Q3": { "patriots": null, "seahawks": null },
            "Final": { "patriots": null, "seahawks": null },
        })
    })
}

/// Backfill the board lock flag as unlocked
pub fn backfill_locked(raw: &mut Value) -> bool {
    insert_missing(raw, "locked", || json!(false))
}

/// Backfill the optimistic-concurrency version counter at 1
pub fn backfill_version(raw: &mut Value) -> bool {
    insert_missing(raw, "version", || json!(1))
}

fn insert_missing(raw: &mut Value, key: &str, default: impl FnOnce() -> Value) -> bool {
    match raw.as_object_mut() {
        Some(fields) if !fields.contains_key(key) => {
            fields.insert(key.to_string(), default());
            true
        }
        _ => false,
    }
}
