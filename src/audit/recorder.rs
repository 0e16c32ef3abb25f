//! Async entry point for recording audit entries
//!
//! Auditing must never break the mutation it describes: [`AuditRecorder::record`]
//! has no error to return. Persistence failures are logged and dropped.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::engine::AuditEngine;
use super::entry::{AuditEntry, AuditRecord};
use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::storage::AuditStore;

/// Runs the audit pipeline and hands records to a store
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
    engine: Arc<AuditEngine>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>, engine: AuditEngine) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
        }
    }

    pub fn from_settings(store: Arc<dyn AuditStore>, settings: &Settings) -> Self {
        Self::new(store, AuditEngine::new(settings))
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    pub fn engine(&self) -> &AuditEngine {
        &self.engine
    }

    /// Record one entry and wait for the write to finish
    ///
    /// Completes normally even when the store fails.
    pub async fn record(&self, entry: AuditEntry) {
        let collection_name = entry.collection_name.clone();
        let action = entry.action;
        let document_id = entry.document_id.clone();
        let actor = entry.actor.clone();

        match self.try_record(entry).await {
            Ok(record) => {
                tracing::debug!(
                    id = %record.id,
                    collection = %collection_name,
                    action = %action,
                    "audit record written"
                );
            }
            Err(error) => {
                tracing::warn!(
                    collection = %collection_name,
                    action = %action,
                    document_id = ?document_id,
                    actor = ?actor,
                    error = %error,
                    "failed to persist audit record"
                );
            }
        }
    }

    /// Record one entry and report what was stored
    ///
    /// For administrative callers that want to see store failures.
    pub async fn try_record(&self, entry: AuditEntry) -> AuditResult<AuditRecord> {
        let record = self.engine.prepare(entry);
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || store.insert(&record).map(|()| record))
            .await
            .map_err(|e| AuditError::Storage(format!("Audit write task failed: {}", e)))?
    }

    /// Record one entry on a detached task
    ///
    /// The returned handle may be dropped; the write still happens.
    pub fn spawn(&self, entry: AuditEntry) -> JoinHandle<()> {
        let recorder = self.clone();
        tokio::spawn(async move { recorder.record(entry).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryAuditStore;
    use serde_json::json;

    struct FailingStore;

    impl AuditStore for FailingStore {
        fn insert(&self, _record: &AuditRecord) -> AuditResult<()> {
            Err(AuditError::Storage("database unavailable".into()))
        }

        fn scan(&self) -> AuditResult<Vec<AuditRecord>> {
            Ok(Vec::new())
        }
    }

    struct PanickingStore;

    impl AuditStore for PanickingStore {
        fn insert(&self, _record: &AuditRecord) -> AuditResult<()> {
            panic!("driver crashed");
        }

        fn scan(&self) -> AuditResult<Vec<AuditRecord>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_record_persists() {
        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::from_settings(store.clone(), &Settings::default());

        recorder
            .record(AuditEntry::create("Employee", "emp-1", json!({"name": "Ann"})))
            .await;

        let records = store.scan().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Created Employee (emp-1)");
    }

    #[tokio::test]
    async fn test_failing_store_does_not_propagate() {
        let recorder = AuditRecorder::from_settings(Arc::new(FailingStore), &Settings::default());
        recorder
            .record(AuditEntry::delete("Employee", "emp-1", json!({"name": "Ann"})))
            .await;
    }

    #[tokio::test]
    async fn test_panicking_store_does_not_propagate() {
        let recorder = AuditRecorder::from_settings(Arc::new(PanickingStore), &Settings::default());
        recorder
            .record(AuditEntry::create("Employee", "emp-1", json!({"name": "Ann"})))
            .await;
    }

    #[tokio::test]
    async fn test_try_record_reports_errors() {
        let recorder = AuditRecorder::from_settings(Arc::new(FailingStore), &Settings::default());
        let err = recorder
            .try_record(AuditEntry::create("Employee", "emp-1", json!({"name": "Ann"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Storage(_)));

        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::from_settings(store.clone(), &Settings::default());
        let record = recorder
            .try_record(AuditEntry::create("Employee", "emp-1", json!({"name": "Ann"})))
            .await
            .unwrap();
        assert_eq!(store.get(&record.id).unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_spawn_detached() {
        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::from_settings(store.clone(), &Settings::default());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                recorder.spawn(AuditEntry::create(
                    "Employee",
                    format!("emp-{}", i),
                    json!({"index": i}),
                ))
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count().unwrap(), 10);
    }
}
