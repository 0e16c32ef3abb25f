//! Redaction of snapshot values
//!
//! String leaves are classified by configurable patterns (email, national
//! id, phone) and masked; anything else that is too long is truncated.
//! Composite values are walked to a fixed depth, beyond which they collapse
//! into placeholders. Redaction never fails: nodes that cannot be processed
//! become sentinel strings.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use super::snapshot::{NodeRef, Snapshot, SnapshotNode};
use crate::config::settings::{
    default_email_pattern, default_national_id_pattern, default_phone_pattern, Settings,
};

pub const ARRAY_PLACEHOLDER: &str = "[array]";
pub const OBJECT_PLACEHOLDER: &str = "[object]";
pub const CIRCULAR_PLACEHOLDER: &str = "[circular]";
pub const ERROR_PLACEHOLDER: &str = "[error]";
pub const TRUNCATION_MARKER: &str = "...";

/// Masks personal data in snapshot values
#[derive(Debug, Clone)]
pub struct Redactor {
    email: Option<Regex>,
    national_id: Option<Regex>,
    phone: Option<Regex>,
    max_field_length: usize,
    max_depth: usize,
}

impl Redactor {
    /// Build a redactor from the configured patterns and limits
    pub fn new(settings: &Settings) -> Self {
        Self {
            email: compile("email", &settings.patterns.email, default_email_pattern),
            national_id: compile(
                "national_id",
                &settings.patterns.national_id,
                default_national_id_pattern,
            ),
            phone: compile("phone", &settings.patterns.phone, default_phone_pattern),
            max_field_length: settings.max_field_length,
            max_depth: settings.max_redact_depth,
        }
    }

    /// Redact a JSON tree
    pub fn redact(&self, value: &Value) -> Value {
        self.redact_value(value, 0)
    }

    /// Redact either kind of snapshot
    pub fn redact_snapshot(&self, snapshot: &Snapshot) -> Value {
        match snapshot {
            Snapshot::Tree(value) => self.redact(value),
            Snapshot::Graph(node) => {
                let mut ancestors = HashSet::new();
                self.redact_node(node, 0, &mut ancestors)
            }
        }
    }

    /// Apply the string rules to a single leaf
    pub fn redact_str(&self, s: &str) -> String {
        if matches(&self.email, s) {
            return mask_email(s);
        }
        if matches(&self.national_id, s) {
            return mask_all_digits(s);
        }
        if matches(&self.phone, s) {
            return mask_phone(s);
        }
        if s.chars().count() > self.max_field_length {
            let mut truncated: String = s.chars().take(self.max_field_length).collect();
            truncated.push_str(TRUNCATION_MARKER);
            return truncated;
        }
        s.to_string()
    }

    fn redact_value(&self, value: &Value, depth: usize) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact_str(s)),
            Value::Array(items) => {
                if depth >= self.max_depth {
                    return Value::String(ARRAY_PLACEHOLDER.to_string());
                }
                Value::Array(
                    items
                        .iter()
                        .map(|item| self.redact_value(item, depth + 1))
                        .collect(),
                )
            }
            Value::Object(fields) => {
                if depth >= self.max_depth {
                    return Value::String(OBJECT_PLACEHOLDER.to_string());
                }
                Value::Object(
                    fields
                        .iter()
                        .map(|(key, field)| (key.clone(), self.redact_value(field, depth + 1)))
                        .collect(),
                )
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }

    fn redact_node(
        &self,
        node: &NodeRef,
        depth: usize,
        ancestors: &mut HashSet<*const SnapshotNode>,
    ) -> Value {
        let ptr = Arc::as_ptr(node);

        match node.as_ref() {
            SnapshotNode::Leaf(value) => self.redact_value(value, depth),
            SnapshotNode::Array(items) => {
                if ancestors.contains(&ptr) {
                    return Value::String(CIRCULAR_PLACEHOLDER.to_string());
                }
                if depth >= self.max_depth {
                    return Value::String(ARRAY_PLACEHOLDER.to_string());
                }
                let Ok(items) = items.read() else {
                    return Value::String(ERROR_PLACEHOLDER.to_string());
                };

                ancestors.insert(ptr);
                let redacted = items
                    .iter()
                    .map(|item| self.redact_node(item, depth + 1, ancestors))
                    .collect();
                ancestors.remove(&ptr);

                Value::Array(redacted)
            }
            SnapshotNode::Object(fields) => {
                if ancestors.contains(&ptr) {
                    return Value::String(CIRCULAR_PLACEHOLDER.to_string());
                }
                if depth >= self.max_depth {
                    return Value::String(OBJECT_PLACEHOLDER.to_string());
                }
                let Ok(fields) = fields.read() else {
                    return Value::String(ERROR_PLACEHOLDER.to_string());
                };

                ancestors.insert(ptr);
                let mut redacted = Map::new();
                for (key, field) in fields.iter() {
                    redacted.insert(key.clone(), self.redact_node(field, depth + 1, ancestors));
                }
                ancestors.remove(&ptr);

                Value::Object(redacted)
            }
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// Compile a configured pattern, falling back to the built-in default
fn compile(label: &str, pattern: &str, default: fn() -> String) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(pattern = label, error = %e, "invalid redaction pattern; using default");
            Regex::new(&default()).ok()
        }
    }
}

fn matches(pattern: &Option<Regex>, s: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(s))
}

/// `john.doe@example.com` → `j***@example.com`
fn mask_email(s: &str) -> String {
    match s.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

fn mask_all_digits(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_digit() { '*' } else { c })
        .collect()
}

/// Mask every digit except the trailing two
fn mask_phone(s: &str) -> String {
    let digits = s.chars().filter(char::is_ascii_digit).count();
    let keep_from = digits.saturating_sub(2);
    let mut seen = 0;

    s.chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            seen += 1;
            if seen > keep_from {
                c
            } else {
                '*'
            }
        })
        .collect()
}
