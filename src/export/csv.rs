//! CSV Export functionality
//!
//! One row per record, spreadsheet-friendly. Snapshots are left out; the
//! changed field names and the message carry the summary.

use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

const HEADERS: [&str; 8] = [
    "id",
    "createdAt",
    "collectionName",
    "action",
    "documentId",
    "actor",
    "changedFields",
    "message",
];

/// Export records to CSV
pub fn export_csv<W: Write>(records: &[AuditRecord], writer: W) -> AuditResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADERS)
        .map_err(|e| AuditError::Export(e.to_string()))?;

    for record in records {
        let changed_fields = record
            .changes
            .as_ref()
            .map(|changes| {
                changes
                    .iter()
                    .map(|c| c.path.as_str())
                    .collect::<Vec<_>>()
                    .join(";")
            })
            .unwrap_or_default();

        csv_writer
            .write_record([
                record.id.to_full_string(),
                record.created_at.to_rfc3339(),
                record.collection_name.clone(),
                record.action.to_string(),
                record.document_id.clone().unwrap_or_default(),
                record.actor.clone().unwrap_or_default(),
                changed_fields,
                record.message.clone(),
            ])
            .map_err(|e| AuditError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}
