//! CLI command for audit log export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::filters::FilterArgs;
use crate::error::{AuditError, AuditResult};
use crate::export::{export_records, ExportFormat};
use crate::services::AuditService;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// JSON with export metadata
    Json,
    /// YAML with export metadata (human-readable)
    Yaml,
    /// One CSV row per record, snapshots left out
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Yaml => ExportFormat::Yaml,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: FormatArg,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Handle the `export` command
pub async fn handle_export_command(service: &AuditService, args: ExportArgs) -> AuditResult<()> {
    let query = args.filters.to_query()?;
    let records = service.export(query).await?;
    let count = records.len();
    let format = ExportFormat::from(args.format);

    match &args.output {
        Some(output) => {
            let file = File::create(output).map_err(|e| {
                AuditError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_records(records, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| AuditError::Export(e.to_string()))?;

            println!(
                "Exported {} audit records as {} to: {}",
                count,
                format,
                output.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            export_records(records, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| AuditError::Export(e.to_string()))?;
        }
    }

    tracing::info!(count, %format, "audit records exported");
    Ok(())
}
