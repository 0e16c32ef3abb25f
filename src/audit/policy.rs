//! Per-collection storage policies
//!
//! Collections are looked up in a table; anything not listed is stored as
//! redacted. Collections marked [`StoragePolicy::Fingerprint`] keep no
//! values at all: only the field names, a content hash, and which fields
//! changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::diff::Diff;
use super::entry::FieldChange;
use crate::config::Settings;

/// Hex characters of the SHA-256 digest kept in a fingerprint
const FINGERPRINT_HEX_LEN: usize = 16;

/// How a collection's snapshots are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoragePolicy {
    /// Store redacted values as they are
    #[default]
    Passthrough,
    /// Store field names and a content hash only
    Fingerprint,
}

/// Values that survive the policy
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutput {
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub diff: Diff,
}

/// Policy lookup keyed by collection name
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    policies: HashMap<String, StoragePolicy>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint every collection listed in `sensitive_collections`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut table = Self::new();
        for collection in &settings.sensitive_collections {
            table.insert(collection.clone(), StoragePolicy::Fingerprint);
        }
        table
    }

    pub fn insert(&mut self, collection_name: impl Into<String>, policy: StoragePolicy) {
        self.policies.insert(collection_name.into(), policy);
    }

    pub fn with_policy(mut self, collection_name: impl Into<String>, policy: StoragePolicy) -> Self {
        self.insert(collection_name, policy);
        self
    }

    pub fn policy_for(&self, collection_name: &str) -> StoragePolicy {
        self.policies
            .get(collection_name)
            .copied()
            .unwrap_or_default()
    }

    /// Apply the collection's policy to redacted snapshots and their diff
    pub fn apply(
        &self,
        collection_name: &str,
        before: Option<Value>,
        after: Option<Value>,
        diff: Diff,
    ) -> PolicyOutput {
        match self.policy_for(collection_name) {
            StoragePolicy::Passthrough => PolicyOutput {
                before,
                after,
                diff,
            },
            StoragePolicy::Fingerprint => PolicyOutput {
                before: None,
                after: after.as_ref().map(fingerprint),
                diff: Diff {
                    changes: diff
                        .changes
                        .into_iter()
                        .map(|change| FieldChange::path_only(change.path))
                        .collect(),
                    total: diff.total,
                },
            },
        }
    }
}

/// `{keys, redacted: true, hash}` summary of a redacted snapshot
pub fn fingerprint(value: &Value) -> Value {
    let keys: Vec<&String> = value
        .as_object()
        .map(|fields| fields.keys().collect())
        .unwrap_or_default();

    json!({
        "keys": keys,
        "redacted": true,
        "hash": content_hash(value),
    })
}

/// First 16 hex characters of the SHA-256 of the serialized value
pub fn content_hash(value: &Value) -> String {
    let serialized = serde_json::to_string(value).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_HEX_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::diff::diff;

    fn draft_table() -> PolicyTable {
        PolicyTable::new().with_policy("EmployeeDraft", StoragePolicy::Fingerprint)
    }

    #[test]
    fn test_default_is_passthrough() {
        let table = draft_table();
        assert_eq!(table.policy_for("Employee"), StoragePolicy::Passthrough);
        assert_eq!(table.policy_for("EmployeeDraft"), StoragePolicy::Fingerprint);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.sensitive_collections.insert("PayrollDraft".into());

        let table = PolicyTable::from_settings(&settings);
        assert_eq!(table.policy_for("EmployeeDraft"), StoragePolicy::Fingerprint);
        assert_eq!(table.policy_for("PayrollDraft"), StoragePolicy::Fingerprint);
        assert_eq!(table.policy_for("Department"), StoragePolicy::Passthrough);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let before = json!({"name": "Ann"});
        let after = json!({"name": "Anne"});
        let d = diff(&before, &after, 30);

        let output = draft_table().apply("Employee", Some(before.clone()), Some(after.clone()), d.clone());
        assert_eq!(
            output,
            PolicyOutput {
                before: Some(before),
                after: Some(after),
                diff: d,
            }
        );
    }

    #[test]
    fn test_fingerprint_strips_values() {
        let before = json!({"email": "a***@x.com", "salary": 50000});
        let after = json!({"email": "b***@x.com", "salary": 72000, "name": "Bea"});
        let d = diff(&before, &after, 30);

        let output = draft_table().apply("EmployeeDraft", Some(before), Some(after.clone()), d);

        assert!(output.before.is_none());
        let stored = output.after.unwrap();
        assert_eq!(stored["keys"], json!(["email", "name", "salary"]));
        assert_eq!(stored["redacted"], json!(true));
        assert_eq!(stored["hash"].as_str().unwrap().len(), 16);

        let serialized = stored.to_string();
        assert!(!serialized.contains("72000"));
        assert!(!serialized.contains("Bea"));
        assert!(!serialized.contains("x.com"));

        assert_eq!(output.diff.total, 3);
        assert!(output.diff.changes.iter().all(FieldChange::is_path_only));
    }

    #[test]
    fn test_fingerprint_without_after() {
        let output = draft_table().apply(
            "EmployeeDraft",
            Some(json!({"name": "Ann"})),
            None,
            Diff::default(),
        );
        assert!(output.before.is_none());
        assert!(output.after.is_none());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = json!({"name": "Ann", "title": "Dev"});
        assert_eq!(content_hash(&a), content_hash(&a.clone()));
        assert_ne!(content_hash(&a), content_hash(&json!({"name": "Ann"})));
        assert!(content_hash(&a).chars().all(|c| c.is_ascii_hexdigit()));
    }
}
