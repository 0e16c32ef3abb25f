//! Export module for hrm-audit
//!
//! Exports audit records in multiple formats:
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: machine-readable export with metadata
//! - YAML: human-readable export with metadata

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use self::csv::export_csv;
pub use json::{export_json, AuditExport, ExportMetadata, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;

use crate::audit::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(AuditError::Validation(format!(
                "Unknown export format: '{}'. Valid formats: json, yaml, csv",
                other
            ))),
        }
    }
}

/// Write `records` in the chosen format
pub fn export_records<W: Write>(
    records: Vec<AuditRecord>,
    format: ExportFormat,
    writer: &mut W,
) -> AuditResult<()> {
    match format {
        ExportFormat::Json => export_json(records, writer, true),
        ExportFormat::Yaml => export_yaml(records, writer),
        ExportFormat::Csv => export_csv(&records, writer),
    }
}
