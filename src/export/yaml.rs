//! YAML Export functionality
//!
//! Exports audit records to YAML for human review.

use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};
use crate::export::json::AuditExport;

/// Export records to YAML format
pub fn export_yaml<W: Write>(records: Vec<AuditRecord>, writer: &mut W) -> AuditResult<()> {
    let export = AuditExport::new(records);
    let io_err = |e: std::io::Error| AuditError::Export(e.to_string());

    writeln!(writer, "# hrm-audit Log Export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer, "# Records: {}", export.metadata.record_count).map_err(io_err)?;
    writeln!(writer, "#").map_err(io_err)?;
    writeln!(
        writer,
        "# Values are redacted; sensitive collections hold fingerprints only."
    )
    .map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}
