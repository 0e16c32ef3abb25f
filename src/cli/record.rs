//! `record` command
//!
//! Records one entry through the full pipeline. Meant for backfills and
//! for trying out redaction settings from the shell.

use clap::Args;
use serde_json::Value;

use crate::audit::{Action, AuditEntry, AuditRecorder};
use crate::display::format_audit_details;
use crate::error::{AuditError, AuditResult};

/// Arguments for `record`
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Collection the document belongs to (e.g. Employee)
    #[arg(short, long)]
    pub collection: String,

    /// Action performed (create, update, delete, access)
    #[arg(short, long)]
    pub action: String,

    /// ID of the affected document
    #[arg(short, long)]
    pub document_id: Option<String>,

    /// ID of the user who performed the action
    #[arg(long)]
    pub actor: Option<String>,

    /// Document state before the mutation, as JSON
    #[arg(long)]
    pub before: Option<String>,

    /// Document state after the mutation, as JSON
    #[arg(long)]
    pub after: Option<String>,

    /// Summary to store instead of the generated one
    #[arg(short, long)]
    pub message: Option<String>,
}

impl RecordArgs {
    /// Turn the arguments into an entry
    pub fn to_entry(&self) -> AuditResult<AuditEntry> {
        let collection = self.collection.trim();
        if collection.is_empty() {
            return Err(AuditError::Validation("Collection name cannot be empty".into()));
        }

        let action: Action = self.action.parse()?;
        let mut entry = AuditEntry::new(collection, action);

        if let Some(document_id) = &self.document_id {
            entry = entry.document(document_id.clone());
        }
        if let Some(actor) = &self.actor {
            entry = entry.actor(actor.clone());
        }
        if let Some(before) = &self.before {
            entry = entry.before(parse_snapshot("before", before)?);
        }
        if let Some(after) = &self.after {
            entry = entry.after(parse_snapshot("after", after)?);
        }
        if let Some(message) = &self.message {
            entry = entry.message(message.clone());
        }

        Ok(entry)
    }
}

fn parse_snapshot(name: &str, raw: &str) -> AuditResult<Value> {
    serde_json::from_str(raw)
        .map_err(|e| AuditError::Validation(format!("--{} is not valid JSON: {}", name, e)))
}

/// Handle the `record` command
pub async fn handle_record_command(recorder: &AuditRecorder, args: RecordArgs) -> AuditResult<()> {
    let entry = args.to_entry()?;
    let record = recorder.try_record(entry).await?;

    println!("Recorded {}", record.id);
    print!("{}", format_audit_details(&record));
    Ok(())
}
