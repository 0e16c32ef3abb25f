//! Storage layer for hrm-audit
//!
//! Audit records are append-only. A store can add a record and hand back
//! everything it holds in insertion order; lookups and queries are built on
//! top of that and may be overridden by stores that can do better.
//!
//! Store methods are blocking. Async callers go through
//! `tokio::task::spawn_blocking`.

pub mod file_io;
pub mod jsonl;
pub mod memory;

pub use file_io::{read_json, write_json_atomic};
pub use jsonl::JsonlAuditStore;
pub use memory::MemoryAuditStore;

use crate::audit::{AuditId, AuditRecord};
use crate::config::AuditPaths;
use crate::error::AuditResult;
use crate::query::{AuditPage, AuditQuery};

/// Persistence for audit records
pub trait AuditStore: Send + Sync {
    /// Append a record
    fn insert(&self, record: &AuditRecord) -> AuditResult<()>;

    /// All records in insertion order
    fn scan(&self) -> AuditResult<Vec<AuditRecord>>;

    /// Find a record by ID
    fn get(&self, id: &AuditId) -> AuditResult<Option<AuditRecord>> {
        Ok(self.scan()?.into_iter().find(|r| &r.id == id))
    }

    /// Run a validated query
    fn query(&self, query: &AuditQuery) -> AuditResult<AuditPage> {
        Ok(query.paginate(self.scan()?))
    }

    /// Number of stored records
    fn count(&self) -> AuditResult<usize> {
        Ok(self.scan()?.len())
    }
}

/// Open the JSONL store under the configured data directory
pub fn open_store(paths: &AuditPaths) -> AuditResult<JsonlAuditStore> {
    paths.ensure_directories()?;
    Ok(JsonlAuditStore::new(paths.audit_log()))
}
