//! The synchronous half of the audit pipeline
//!
//! [`AuditEngine::prepare`] turns an [`AuditEntry`] into the
//! [`AuditRecord`] that gets persisted. Every step is CPU-only and cannot
//! fail; anything that goes wrong along the way ends up as a placeholder
//! or a dropped payload.

use chrono::Utc;
use serde_json::Value;

use super::bound::bound;
use super::diff::{diff, Diff};
use super::entry::{AuditEntry, AuditRecord};
use super::ids::AuditId;
use super::message::synthesize;
use super::policy::PolicyTable;
use super::redact::Redactor;
use crate::config::Settings;

/// Redaction, diffing, collection policy, bounding and message synthesis
#[derive(Debug, Clone)]
pub struct AuditEngine {
    redactor: Redactor,
    policies: PolicyTable,
    max_change_entries: usize,
    max_payload_bytes: usize,
}

impl AuditEngine {
    /// Build an engine from user settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            redactor: Redactor::new(settings),
            policies: PolicyTable::from_settings(settings),
            max_change_entries: settings.max_change_entries,
            max_payload_bytes: settings.max_payload_bytes,
        }
    }

    /// Replace the policy table built from settings
    pub fn with_policies(mut self, policies: PolicyTable) -> Self {
        self.policies = policies;
        self
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Run the pipeline for one entry
    ///
    /// A diff is computed only when both snapshots are present. The message
    /// is synthesized from the post-policy diff so fingerprinted
    /// collections never expose values through it.
    pub fn prepare(&self, entry: AuditEntry) -> AuditRecord {
        let AuditEntry {
            collection_name,
            document_id,
            action,
            actor,
            before,
            after,
            message,
        } = entry;

        let before = before.map(|s| self.redactor.redact_snapshot(&s));
        let after = after.map(|s| self.redactor.redact_snapshot(&s));

        let changes = match (&before, &after) {
            (Some(b), Some(a)) => diff(b, a, self.max_change_entries),
            _ => Diff::default(),
        };

        let output = self
            .policies
            .apply(&collection_name, before, after, changes);

        let before = self.bound(output.before);
        let after = self.bound(output.after);

        let message = message.unwrap_or_else(|| {
            synthesize(
                action,
                &collection_name,
                document_id.as_deref(),
                &output.diff,
            )
        });

        let changes = (!output.diff.changes.is_empty()).then_some(output.diff.changes);

        AuditRecord {
            id: AuditId::new(),
            collection_name,
            document_id,
            action,
            actor,
            before,
            after,
            changes,
            message,
            created_at: Utc::now(),
        }
    }

    fn bound(&self, value: Option<Value>) -> Option<Value> {
        value.and_then(|v| bound(v, self.max_payload_bytes))
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Action;
    use crate::audit::snapshot::SnapshotNode;
    use serde_json::json;

    #[test]
    fn test_create_redacts_after() {
        let engine = AuditEngine::default();
        let record = engine.prepare(
            AuditEntry::create("Employee", "emp-1", json!({"name": "Ann", "email": "ann@x.com"}))
                .actor("admin-1"),
        );

        assert_eq!(record.action, Action::Create);
        assert_eq!(record.message, "Created Employee (emp-1)");
        assert_eq!(record.after.as_ref().unwrap()["email"], "a***@x.com");
        assert_eq!(record.after.as_ref().unwrap()["name"], "Ann");
        assert!(record.before.is_none());
        assert!(record.changes.is_none());
        assert_eq!(record.actor.as_deref(), Some("admin-1"));
    }

    #[test]
    fn test_update_produces_changes() {
        let engine = AuditEngine::default();
        let record = engine.prepare(AuditEntry::update(
            "Payroll",
            "pay-1",
            json!({"salary": 50000, "currency": "EUR"}),
            json!({"salary": 55000, "currency": "EUR"}),
        ));

        let changes = record.changes.unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "salary");
        assert_eq!(changes[0].before, Some(json!(50000)));
        assert_eq!(changes[0].after, Some(json!(55000)));
        assert!(record.message.contains("salary: 50000 → 55000"));
    }

    #[test]
    fn test_diff_compares_redacted_values() {
        let engine = AuditEngine::default();
        let record = engine.prepare(AuditEntry::update(
            "Employee",
            "emp-1",
            json!({"email": "ann@x.com"}),
            json!({"email": "alice@x.com"}),
        ));

        // Both mask to a***@x.com
        assert!(record.changes.is_none());
        assert_eq!(record.message, "Updated Employee (emp-1)");
    }

    #[test]
    fn test_caller_message_is_kept_verbatim() {
        let engine = AuditEngine::default();
        let record = engine.prepare(
            AuditEntry::delete("Department", "dep-1", json!({"name": "Ops"}))
                .message("Merged into Operations"),
        );
        assert_eq!(record.message, "Merged into Operations");
        assert!(record.before.is_some());
        assert!(record.after.is_none());
    }

    #[test]
    fn test_oversized_payload_dropped() {
        let engine = AuditEngine::default();
        let record = engine.prepare(AuditEntry::create(
            "Employee",
            "emp-1",
            json!({"notes": "word ".repeat(40), "blob": vec!["x".repeat(150); 200]}),
        ));
        assert!(record.after.is_none());
        assert_eq!(record.message, "Created Employee (emp-1)");
    }

    #[test]
    fn test_sensitive_collection_fingerprinted() {
        let engine = AuditEngine::default();
        let record = engine.prepare(AuditEntry::update(
            "EmployeeDraft",
            "draft-1",
            json!({"salary": 50000, "name": "Ann"}),
            json!({"salary": 72000, "name": "Ann"}),
        ));

        assert!(record.before.is_none());
        let after = record.after.unwrap();
        assert_eq!(after["redacted"], json!(true));
        assert_eq!(after["keys"], json!(["name", "salary"]));

        let changes = record.changes.unwrap();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].is_path_only());

        assert_eq!(record.message, "Updated EmployeeDraft (draft-1) — salary");
        assert!(!record.message.contains("72000"));
    }

    #[test]
    fn test_custom_policy_table() {
        let engine = AuditEngine::default().with_policies(PolicyTable::new());
        let record = engine.prepare(AuditEntry::create(
            "EmployeeDraft",
            "draft-1",
            json!({"name": "Ann"}),
        ));
        assert_eq!(record.after, Some(json!({"name": "Ann"})));
    }

    #[test]
    fn test_graph_snapshot_with_cycle() {
        let employee = SnapshotNode::object();
        let manager = SnapshotNode::object();
        employee.insert("name", SnapshotNode::leaf("Ann"));
        employee.insert("manager", manager.clone());
        manager.insert("name", SnapshotNode::leaf("Bob"));
        manager.insert("report", employee.clone());

        let engine = AuditEngine::default();
        let record = engine.prepare(AuditEntry::create("Employee", "emp-1", employee));

        let after = record.after.unwrap();
        assert_eq!(after["manager"]["name"], "Bob");
        assert_eq!(after["manager"]["report"], "[circular]");
    }

    #[test]
    fn test_change_cap_from_settings() {
        let settings = Settings {
            max_change_entries: 2,
            ..Settings::default()
        };
        let engine = AuditEngine::new(&settings);
        let record = engine.prepare(AuditEntry::update(
            "Employee",
            "emp-1",
            json!({"a": 1, "b": 1, "c": 1, "d": 1}),
            json!({"a": 2, "b": 2, "c": 2, "d": 2}),
        ));

        assert_eq!(record.changes.unwrap().len(), 2);
        assert!(record.message.ends_with("(+2 more)"));
    }

    #[test]
    fn test_zero_change_cap_still_counts_changes() {
        let settings = Settings {
            max_change_entries: 0,
            ..Settings::default()
        };
        let record = AuditEngine::new(&settings).prepare(AuditEntry::update(
            "Employee",
            "e1",
            json!({"a": 1, "b": 1}),
            json!({"a": 2, "b": 2}),
        ));

        assert!(record.changes.is_none());
        assert_eq!(record.message, "Updated Employee (e1) (+2 more)");
    }
}
