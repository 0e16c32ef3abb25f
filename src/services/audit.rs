//! Audit query service
//!
//! Validates queries before touching storage and runs store reads on the
//! blocking pool.

use std::sync::Arc;

use crate::audit::{AuditId, AuditRecord};
use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::query::{AuditPage, AuditQuery};
use crate::storage::AuditStore;

/// Read access to the audit log
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    default_limit: usize,
    max_limit: usize,
}

impl AuditService {
    /// Create a service with the default page limits
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self::from_settings(store, &Settings::default())
    }

    pub fn from_settings(store: Arc<dyn AuditStore>, settings: &Settings) -> Self {
        Self {
            store,
            default_limit: settings.default_page_limit.max(1),
            max_limit: settings.max_page_limit.max(1),
        }
    }

    /// Page size to use when the caller gives none
    pub fn default_limit(&self) -> usize {
        self.default_limit.min(self.max_limit)
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// List one page of matching records, newest first
    pub async fn list(&self, query: AuditQuery) -> AuditResult<AuditPage> {
        let query = query.validate(self.max_limit)?;
        let store = Arc::clone(&self.store);

        run_blocking(move || store.query(&query)).await
    }

    /// Fetch a single record
    pub async fn get(&self, id: AuditId) -> AuditResult<AuditRecord> {
        let store = Arc::clone(&self.store);

        run_blocking(move || store.get(&id))
            .await?
            .ok_or_else(|| AuditError::record_not_found(id.to_full_string()))
    }

    /// Look up a record by full ID or by its short `aud-xxxxxxxx` form
    pub async fn find(&self, identifier: &str) -> AuditResult<Option<AuditRecord>> {
        let identifier = identifier.trim().to_string();

        if let Ok(id) = identifier.parse::<AuditId>() {
            let store = Arc::clone(&self.store);
            return run_blocking(move || store.get(&id)).await;
        }

        let store = Arc::clone(&self.store);
        run_blocking(move || {
            Ok(store
                .scan()?
                .into_iter()
                .find(|r| r.id.to_string().eq_ignore_ascii_case(&identifier)))
        })
        .await
    }

    /// Every record matching the filters, newest first, ignoring pagination
    pub async fn export(&self, query: AuditQuery) -> AuditResult<Vec<AuditRecord>> {
        let store = Arc::clone(&self.store);

        run_blocking(move || Ok(query.filter_sorted(store.scan()?))).await
    }
}

async fn run_blocking<T, F>(f: F) -> AuditResult<T>
where
    F: FnOnce() -> AuditResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuditError::Storage(format!("Storage task failed: {}", e)))?
}
