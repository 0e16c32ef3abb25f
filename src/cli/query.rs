//! `list` and `show` commands

use clap::Args;

use super::filters::FilterArgs;
use crate::display::{format_audit_details, format_audit_page};
use crate::error::{AuditError, AuditResult};
use crate::services::AuditService;

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Records per page (capped by max_page_limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the `list` command
pub async fn handle_list_command(service: &AuditService, args: ListArgs) -> AuditResult<()> {
    let query = args
        .filters
        .to_query()?
        .page(args.page)
        .limit(args.limit.unwrap_or_else(|| service.default_limit()));

    let page = service.list(query).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&page)
            .map_err(|e| AuditError::Json(format!("Failed to serialize page: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", format_audit_page(&page));
    }

    Ok(())
}

/// Handle the `show` command
pub async fn handle_show_command(service: &AuditService, id: &str, json: bool) -> AuditResult<()> {
    let record = service
        .find(id)
        .await?
        .ok_or_else(|| AuditError::record_not_found(id))?;

    if json {
        let output = serde_json::to_string_pretty(&record)
            .map_err(|e| AuditError::Json(format!("Failed to serialize record: {}", e)))?;
        println!("{}", output);
    } else {
        print!("{}", format_audit_details(&record));
    }

    Ok(())
}
