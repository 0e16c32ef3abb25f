//! JSON Export functionality
//!
//! Exports audit records to JSON with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit log export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Exported records, newest first
    pub records: Vec<AuditRecord>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,

    /// Distinct collection names, sorted
    pub collections: Vec<String>,

    /// Oldest `created_at` in the export
    pub earliest_record: Option<DateTime<Utc>>,

    /// Newest `created_at` in the export
    pub latest_record: Option<DateTime<Utc>>,
}

impl AuditExport {
    pub fn new(records: Vec<AuditRecord>) -> Self {
        let mut collections: Vec<String> = records
            .iter()
            .map(|r| r.collection_name.clone())
            .collect();
        collections.sort();
        collections.dedup();

        let metadata = ExportMetadata {
            record_count: records.len(),
            collections,
            earliest_record: records.iter().map(|r| r.created_at).min(),
            latest_record: records.iter().map(|r| r.created_at).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            records,
            metadata,
        }
    }
}

/// Export records to JSON
pub fn export_json<W: Write>(records: Vec<AuditRecord>, writer: &mut W, pretty: bool) -> AuditResult<()> {
    let export = AuditExport::new(records);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| AuditError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}
