//! In-memory audit store

use std::sync::RwLock;

use crate::audit::{AuditId, AuditRecord};
use crate::error::{AuditError, AuditResult};

use super::AuditStore;

/// Audit store that keeps records in a vector
///
/// Nothing survives the process. Useful for tests and for embedding the
/// recorder where another component ships the records elsewhere.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for MemoryAuditStore {
    fn insert(&self, record: &AuditRecord) -> AuditResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        records.push(record.clone());
        Ok(())
    }

    fn scan(&self) -> AuditResult<Vec<AuditRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.clone())
    }

    fn get(&self, id: &AuditId) -> AuditResult<Option<AuditRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    fn count(&self) -> AuditResult<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.len())
    }
}
