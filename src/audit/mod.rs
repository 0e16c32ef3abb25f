//! Audit logging engine for HR data mutations
//!
//! Records create, update, delete and access operations with redacted
//! before/after values in an append-only store.
//!
//! # Architecture
//!
//! An entry goes through these steps, in order:
//!
//! - `redact`: masks emails, national ids and phone numbers, truncates long
//!   strings and collapses deep or circular structures.
//! - `diff`: lists the top-level fields that differ between the redacted
//!   snapshots, capped in count.
//! - `policy`: replaces snapshots of sensitive collections with a
//!   fingerprint and strips values from their changes.
//! - `bound`: drops before/after values whose serialized size is too large.
//! - `message`: builds a one-line summary unless the caller supplied one.
//!
//! `AuditEngine` runs those steps synchronously; `AuditRecorder` adds the
//! store write and makes sure a failure there never reaches the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use hrm_audit::audit::{AuditEntry, AuditRecorder, Snapshot};
//! use hrm_audit::storage::JsonlAuditStore;
//! use serde_json::json;
//!
//! let store = Arc::new(JsonlAuditStore::new(paths.audit_log()));
//! let recorder = AuditRecorder::from_settings(store, &settings);
//!
//! // Wait for the write
//! recorder
//!     .record(
//!         AuditEntry::update(
//!             "Employee",
//!             "emp-1",
//!             Snapshot::from_serialize(&before),
//!             Snapshot::from_serialize(&after),
//!         )
//!         .actor(user_id),
//!     )
//!     .await;
//!
//! // Or let it run in the background
//! recorder.spawn(AuditEntry::create("Department", "dep-4", json!({"name": "Ops"})));
//! ```

pub mod bound;
pub mod diff;
pub mod engine;
pub mod entry;
pub mod ids;
pub mod message;
pub mod policy;
pub mod recorder;
pub mod redact;
pub mod snapshot;

pub use bound::bound;
pub use diff::{diff, Diff};
pub use engine::AuditEngine;
pub use entry::{Action, AuditEntry, AuditRecord, FieldChange};
pub use ids::AuditId;
pub use message::synthesize;
pub use policy::{PolicyOutput, PolicyTable, StoragePolicy};
pub use recorder::AuditRecorder;
pub use redact::Redactor;
pub use snapshot::{NodeRef, Snapshot, SnapshotNode};
