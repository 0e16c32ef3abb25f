//! Audit record display formatting
//!
//! Formats audit records for terminal output in table and detail views.

use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::audit::{AuditRecord, FieldChange};
use crate::query::AuditPage;

/// Longest message shown in the list view before it is cut
const MESSAGE_WIDTH: usize = 60;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When (UTC)")]
    created_at: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Collection")]
    collection: String,
    #[tabled(rename = "Document")]
    document: String,
    #[tabled(rename = "Actor")]
    actor: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&AuditRecord> for AuditRow {
    fn from(record: &AuditRecord) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: record.action.to_string(),
            collection: record.collection_name.clone(),
            document: record.document_id.clone().unwrap_or_else(|| "-".into()),
            actor: record.actor.clone().unwrap_or_else(|| "system".into()),
            message: shorten(&record.message, MESSAGE_WIDTH),
        }
    }
}

/// Format a page of records as a table with a paging footer
pub fn format_audit_page(page: &AuditPage) -> String {
    if page.items.is_empty() {
        return if page.total == 0 {
            "No audit records found.".to_string()
        } else {
            format!(
                "No records on page {} ({} matching records, {} pages).",
                page.page,
                page.total,
                page.page_count()
            )
        };
    }

    let rows: Vec<AuditRow> = page.items.iter().map(AuditRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\n\nPage {} of {} ({} matching records)",
        table,
        page.page,
        page.page_count(),
        page.total
    )
}

/// Format a single record's details
pub fn format_audit_details(record: &AuditRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Audit record: {}\n", record.id.to_full_string()));
    output.push_str(&format!(
        "  When:           {}\n",
        record.created_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    ));
    output.push_str(&format!("  Action:         {}\n", record.action));
    output.push_str(&format!("  Collection:     {}\n", record.collection_name));
    output.push_str(&format!(
        "  Document:       {}\n",
        record.document_id.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Actor:          {}\n",
        record.actor.as_deref().unwrap_or("system")
    ));
    output.push_str(&format!("  Message:        {}\n", record.message));

    if let Some(changes) = &record.changes {
        output.push_str(&format!("\nChanges ({}):\n", changes.len()));
        for change in changes {
            output.push_str(&format!("  {}\n", format_change(change)));
        }
    }

    for (label, value) in [("Before", &record.before), ("After", &record.after)] {
        output.push_str(&format!("\n{}:\n", label));
        match value {
            Some(v) => {
                let pretty = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
                for line in pretty.lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
            None => output.push_str("  (not stored)\n"),
        }
    }

    output
}

fn format_change(change: &FieldChange) -> String {
    if change.is_path_only() {
        return change.path.clone();
    }

    let render = |v: &Option<Value>| match v {
        Some(v) => v.to_string(),
        None => "(none)".to_string(),
    };

    format!("{}: {} -> {}", change.path, render(&change.before), render(&change.after))
}

fn shorten(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEngine, AuditEntry};
    use serde_json::json;

    fn page_of(items: Vec<AuditRecord>, total: usize, page: usize) -> AuditPage {
        AuditPage {
            items,
            total,
            page,
            limit: 20,
        }
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(format_audit_page(&page_of(vec![], 0, 1)), "No audit records found.");
        assert!(format_audit_page(&page_of(vec![], 45, 9)).contains("page 9"));
    }

    #[test]
    fn test_page_table() {
        let record = AuditEngine::default()
            .prepare(AuditEntry::create("Employee", "emp-1", json!({"name": "Ann"})).actor("hr-1"));
        let output = format_audit_page(&page_of(vec![record.clone()], 1, 1));

        assert!(output.contains("Collection"));
        assert!(output.contains(&record.id.to_string()));
        assert!(output.contains("Created Employee (emp-1)"));
        assert!(output.contains("hr-1"));
        assert!(output.contains("Page 1 of 1 (1 matching records)"));
    }

    #[test]
    fn test_details_view() {
        let record = AuditEngine::default().prepare(AuditEntry::update(
            "Payroll",
            "pay-1",
            json!({"salary": 50000}),
            json!({"salary": 55000}),
        ));
        let output = format_audit_details(&record);

        assert!(output.contains(&record.id.to_full_string()));
        assert!(output.contains("Actor:          system"));
        assert!(output.contains("salary: 50000 -> 55000"));
        assert!(output.contains("\"salary\": 55000"));
    }

    #[test]
    fn test_details_without_snapshots() {
        let record = AuditEngine::default().prepare(AuditEntry::new("Payroll", crate::audit::Action::Access));
        let output = format_audit_details(&record);
        assert!(output.contains("Document:       -"));
        assert_eq!(output.matches("(not stored)").count(), 2);
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short", 10), "short");
        assert_eq!(shorten("abcdefghijkl", 8), "abcde...");
    }
}
