//! Top-level field diff between redacted snapshots
//!
//! Only top-level fields are compared. Two values are equal when their
//! JSON serializations are identical, so a nested object whose keys were
//! reordered counts as a change.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::entry::FieldChange;
use super::snapshot::UNSERIALIZABLE;

/// Changed fields, capped in count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    /// At most `max_entries` changes, in key order
    pub changes: Vec<FieldChange>,
    /// Number of differing fields, including ones that did not fit
    pub total: usize,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when some differing fields were left out of `changes`
    pub fn is_truncated(&self) -> bool {
        self.total > self.changes.len()
    }
}

/// Compare two redacted snapshots field by field
///
/// Non-object inputs are treated as objects with no fields.
pub fn diff(before: &Value, after: &Value, max_entries: usize) -> Diff {
    let empty = Map::new();
    let before_fields = before.as_object().unwrap_or(&empty);
    let after_fields = after.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = before_fields.keys().chain(after_fields.keys()).collect();

    let mut result = Diff::default();
    for key in keys {
        let before_val = before_fields.get(key);
        let after_val = after_fields.get(key);

        if canonical(before_val) == canonical(after_val) {
            continue;
        }

        result.total += 1;
        if result.changes.len() < max_entries {
            result.changes.push(FieldChange {
                path: key.clone(),
                before: before_val.cloned(),
                after: after_val.cloned(),
            });
        }
    }

    result
}

/// Serialized form used for comparison; `None` means the field is absent
fn canonical(value: Option<&Value>) -> Option<String> {
    value.map(|v| serde_json::to_string(v).unwrap_or_else(|_| UNSERIALIZABLE.to_string()))
}
