//! Audit entry and record data structures
//!
//! An [`AuditEntry`] is what a mutation handler hands to the recorder. An
//! [`AuditRecord`] is what ends up in the store after redaction, diffing,
//! collection policy and payload bounding.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::AuditId;
use super::snapshot::Snapshot;
use crate::error::AuditError;

/// Kinds of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Document was created
    Create,
    /// Document was updated
    Update,
    /// Document was deleted
    Delete,
    /// Document was read (sensitive lookups)
    Access,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Access => "access",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "access" => Ok(Action::Access),
            other => Err(AuditError::Validation(format!(
                "Invalid action: '{}'. Valid actions: create, update, delete, access",
                other
            ))),
        }
    }
}

/// Description of a mutation, supplied by the caller
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Logical name of the mutated entity type (e.g. "Employee")
    pub collection_name: String,

    /// ID of the mutated document, absent for bulk or unknown targets
    pub document_id: Option<String>,

    pub action: Action,

    /// ID of the acting user; absent means system-initiated
    pub actor: Option<String>,

    /// Pre-mutation snapshot (absent for creates)
    pub before: Option<Snapshot>,

    /// Post-mutation snapshot (absent for deletes)
    pub after: Option<Snapshot>,

    /// Caller-supplied summary; synthesized when absent
    pub message: Option<String>,
}

impl AuditEntry {
    /// Start an entry with only the required fields
    pub fn new(collection_name: impl Into<String>, action: Action) -> Self {
        Self {
            collection_name: collection_name.into(),
            document_id: None,
            action,
            actor: None,
            before: None,
            after: None,
            message: None,
        }
    }

    /// Entry for a create operation
    pub fn create(
        collection_name: impl Into<String>,
        document_id: impl Into<String>,
        after: impl Into<Snapshot>,
    ) -> Self {
        Self::new(collection_name, Action::Create)
            .document(document_id)
            .after(after)
    }

    /// Entry for an update operation
    pub fn update(
        collection_name: impl Into<String>,
        document_id: impl Into<String>,
        before: impl Into<Snapshot>,
        after: impl Into<Snapshot>,
    ) -> Self {
        Self::new(collection_name, Action::Update)
            .document(document_id)
            .before(before)
            .after(after)
    }

    /// Entry for a delete operation
    pub fn delete(
        collection_name: impl Into<String>,
        document_id: impl Into<String>,
        before: impl Into<Snapshot>,
    ) -> Self {
        Self::new(collection_name, Action::Delete)
            .document(document_id)
            .before(before)
    }

    pub fn document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn before(mut self, before: impl Into<Snapshot>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn after(mut self, after: impl Into<Snapshot>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A single changed top-level field
///
/// `before`/`after` are redacted values. Both are absent for collections
/// whose policy only records which fields changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl FieldChange {
    /// A change that names the field without carrying values
    pub fn path_only(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            before: None,
            after: None,
        }
    }

    pub fn is_path_only(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// A persisted audit record; never modified after it is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: AuditId,

    pub collection_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    pub action: Action,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Redacted, size-bounded pre-mutation value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// Redacted, size-bounded post-mutation value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<FieldChange>>,

    pub message: String,

    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Format the record as a single line for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action.as_str().to_uppercase(),
            self.collection_name,
            self.document_id.as_deref().unwrap_or("-")
        );

        if let Some(actor) = &self.actor {
            output.push_str(&format!(" by {}", actor));
        }

        output.push_str(&format!("\n  {}", self.message));
        output
    }
}
