//! Human-readable summaries for audit records

use serde_json::Value;

use super::diff::Diff;
use super::entry::{Action, FieldChange};

/// Number of field changes spelled out in an update message
const MAX_LISTED_CHANGES: usize = 3;

const UNKNOWN_ID: &str = "unknown id";

/// Build the summary line for a record
///
/// ```text
/// Created Employee (64b1f0)
/// Updated Employee (64b1f0) — salary: 50000 → 55000; title: "Dev" → "Lead" (+2 more)
/// access on Payroll (unknown id)
/// ```
pub fn synthesize(
    action: Action,
    collection_name: &str,
    document_id: Option<&str>,
    diff: &Diff,
) -> String {
    let id = document_id.unwrap_or(UNKNOWN_ID);

    match action {
        Action::Create => format!("Created {} ({})", collection_name, id),
        Action::Delete => format!("Deleted {} ({})", collection_name, id),
        Action::Update if diff.is_empty() => {
            format!("Updated {} ({})", collection_name, id)
        }
        Action::Update => {
            let listed: Vec<String> = diff
                .changes
                .iter()
                .take(MAX_LISTED_CHANGES)
                .map(describe_change)
                .collect();

            let mut message = format!("Updated {} ({})", collection_name, id);
            if !listed.is_empty() {
                message.push_str(&format!(" — {}", listed.join("; ")));
            }

            let remaining = diff.total.saturating_sub(listed.len());
            if remaining > 0 {
                message.push_str(&format!(" (+{} more)", remaining));
            }
            message
        }
        other => format!("{} on {} ({})", other, collection_name, id),
    }
}

fn describe_change(change: &FieldChange) -> String {
    if change.is_path_only() {
        return change.path.clone();
    }

    format!(
        "{}: {} → {}",
        change.path,
        format_optional(change.before.as_ref()),
        format_optional(change.after.as_ref())
    )
}

fn format_optional(value: Option<&Value>) -> String {
    value.map(format_value).unwrap_or_else(|| "(none)".to_string())
}

/// Format a JSON value for a one-line summary
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
