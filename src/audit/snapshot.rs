//! Before/after snapshots handed to the audit engine
//!
//! Most callers pass a plain JSON tree produced by serializing their entity.
//! Callers holding an object graph with shared references (for example a
//! populated relation that points back at its parent) can build a
//! [`SnapshotNode`] graph instead; the redactor walks it with cycle
//! detection.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;

/// Placeholder stored when an entity cannot be serialized
pub const UNSERIALIZABLE: &str = "[unserializable]";

/// Shared handle to a graph node
pub type NodeRef = Arc<SnapshotNode>;

/// A node of a snapshot graph
///
/// Children are behind locks so a graph can be wired up after creation,
/// including edges back to an ancestor.
pub enum SnapshotNode {
    Leaf(Value),
    Array(RwLock<Vec<NodeRef>>),
    Object(RwLock<BTreeMap<String, NodeRef>>),
}

impl SnapshotNode {
    pub fn leaf(value: impl Into<Value>) -> NodeRef {
        Arc::new(Self::Leaf(value.into()))
    }

    pub fn array() -> NodeRef {
        Arc::new(Self::Array(RwLock::new(Vec::new())))
    }

    pub fn object() -> NodeRef {
        Arc::new(Self::Object(RwLock::new(BTreeMap::new())))
    }

    /// Set a field on an object node; returns false for other node kinds
    pub fn insert(&self, key: impl Into<String>, child: NodeRef) -> bool {
        match self {
            Self::Object(fields) => match fields.write() {
                Ok(mut fields) => {
                    fields.insert(key.into(), child);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Append to an array node; returns false for other node kinds
    pub fn push(&self, child: NodeRef) -> bool {
        match self {
            Self::Array(items) => match items.write() {
                Ok(mut items) => {
                    items.push(child);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

// Derived Debug would recurse forever on a cyclic graph.
impl fmt::Debug for SnapshotNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Self::Array(items) => {
                let len = items.read().map(|items| items.len()).ok();
                f.debug_struct("Array").field("len", &len).finish()
            }
            Self::Object(fields) => {
                let keys: Option<Vec<String>> =
                    fields.read().map(|fields| fields.keys().cloned().collect()).ok();
                f.debug_struct("Object").field("keys", &keys).finish()
            }
        }
    }
}

/// A pre- or post-mutation view of a document
#[derive(Debug, Clone)]
pub enum Snapshot {
    Tree(Value),
    Graph(NodeRef),
}

impl Snapshot {
    /// Serialize a business entity into a tree snapshot
    ///
    /// Serialization failures produce the `"[unserializable]"` placeholder
    /// rather than an error.
    pub fn from_serialize<T: Serialize>(entity: &T) -> Self {
        match serde_json::to_value(entity) {
            Ok(value) => Self::Tree(value),
            Err(e) => {
                tracing::debug!(error = %e, "snapshot serialization failed");
                Self::Tree(Value::String(UNSERIALIZABLE.to_string()))
            }
        }
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self::Tree(value)
    }
}

impl From<NodeRef> for Snapshot {
    fn from(node: NodeRef) -> Self {
        Self::Graph(node)
    }
}
