//! Payload size bounding
//!
//! Oversized before/after values are dropped whole. A truncated snapshot
//! would look like a real document with missing fields, which is worse than
//! no snapshot at all.

use serde::Serialize;
use serde_json::Value;

/// Serialized size in bytes, or `None` if the value cannot be serialized
pub fn serialized_len<T: Serialize + ?Sized>(value: &T) -> Option<usize> {
    serde_json::to_vec(value).ok().map(|bytes| bytes.len())
}

/// Keep `value` only if its serialized form fits in `max_bytes`
pub fn bound(value: Value, max_bytes: usize) -> Option<Value> {
    match serialized_len(&value) {
        Some(len) if len <= max_bytes => Some(value),
        Some(len) => {
            tracing::debug!(len, max_bytes, "dropping oversized audit payload");
            None
        }
        None => {
            tracing::debug!(max_bytes, "dropping unserializable audit payload");
            None
        }
    }
}
