//! Engine settings for hrm-audit
//!
//! Settings live in `config.json` next to the audit log. Every field has a
//! default, so a partial or missing file is fine. Environment variables
//! override individual limits on top of whatever the file says.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::error::AuditError;
use crate::storage::file_io::{read_json, write_json_atomic};

pub const MAX_CHANGE_ENTRIES_ENV: &str = "HRM_AUDIT_MAX_CHANGE_ENTRIES";
pub const MAX_FIELD_LENGTH_ENV: &str = "HRM_AUDIT_MAX_FIELD_LENGTH";
pub const MAX_PAYLOAD_BYTES_ENV: &str = "HRM_AUDIT_MAX_PAYLOAD_BYTES";
pub const MAX_REDACT_DEPTH_ENV: &str = "HRM_AUDIT_MAX_REDACT_DEPTH";
pub const SENSITIVE_COLLECTIONS_ENV: &str = "HRM_AUDIT_SENSITIVE_COLLECTIONS";
pub const BIND_ENV: &str = "HRM_AUDIT_BIND";

/// Smallest accepted `max_change_entries`
pub const MIN_CHANGE_ENTRIES: usize = 1;

/// Regular expressions used by the redactor to classify string leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPatterns {
    #[serde(default = "default_email_pattern")]
    pub email: String,

    /// 3-2-4 digit groups (US SSN shape)
    #[serde(default = "default_national_id_pattern")]
    pub national_id: String,

    #[serde(default = "default_phone_pattern")]
    pub phone: String,
}

pub fn default_email_pattern() -> String {
    r"^[^\s@]+@[^\s@]+\.[^\s@]+$".to_string()
}

pub fn default_national_id_pattern() -> String {
    r"^\d{3}-\d{2}-\d{4}$".to_string()
}

pub fn default_phone_pattern() -> String {
    r"^\+?[\d\s\-().]{7,}$".to_string()
}

impl Default for RedactionPatterns {
    fn default() -> Self {
        Self {
            email: default_email_pattern(),
            national_id: default_national_id_pattern(),
            phone: default_phone_pattern(),
        }
    }
}

/// User-tunable settings for the audit engine and its query surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Maximum number of field changes stored per record
    #[serde(default = "default_max_change_entries")]
    pub max_change_entries: usize,

    /// Strings longer than this (in characters) are truncated
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,

    /// Serialized before/after values above this size are dropped
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// Nesting depth at which arrays and objects become placeholders
    #[serde(default = "default_max_redact_depth")]
    pub max_redact_depth: usize,

    /// Collections stored as fingerprints only
    #[serde(default = "default_sensitive_collections")]
    pub sensitive_collections: BTreeSet<String>,

    #[serde(default)]
    pub patterns: RedactionPatterns,

    /// Page size used when a query does not specify one
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Server-enforced ceiling on the page size
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,

    /// Listen address for `hrm-audit serve`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_change_entries() -> usize {
    30
}

fn default_max_field_length() -> usize {
    200
}

fn default_max_payload_bytes() -> usize {
    8192
}

fn default_max_redact_depth() -> usize {
    3
}

fn default_sensitive_collections() -> BTreeSet<String> {
    BTreeSet::from(["EmployeeDraft".to_string()])
}

fn default_page_limit() -> usize {
    20
}

fn default_max_page_limit() -> usize {
    100
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            max_change_entries: default_max_change_entries(),
            max_field_length: default_max_field_length(),
            max_payload_bytes: default_max_payload_bytes(),
            max_redact_depth: default_max_redact_depth(),
            sensitive_collections: default_sensitive_collections(),
            patterns: RedactionPatterns::default(),
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
            bind_address: default_bind_address(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        // Don't save defaults here - let the caller decide when to persist
        read_json(paths.settings_file())
            .map_err(|e| AuditError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Load settings from disk and apply environment overrides
    pub fn load(paths: &AuditPaths) -> Result<Self, AuditError> {
        let mut settings = Self::load_or_create(paths)?;
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.clamp_limits();
        Ok(settings)
    }

    /// Raise limits that would make records lose information
    pub fn clamp_limits(&mut self) {
        if self.max_change_entries < MIN_CHANGE_ENTRIES {
            tracing::warn!(
                configured = self.max_change_entries,
                min = MIN_CHANGE_ENTRIES,
                "max_change_entries too small; clamping"
            );
            self.max_change_entries = MIN_CHANGE_ENTRIES;
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    ///
    /// Values that fail to parse are ignored and the file value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_usize(&lookup, MAX_CHANGE_ENTRIES_ENV, &mut self.max_change_entries);
        override_usize(&lookup, MAX_FIELD_LENGTH_ENV, &mut self.max_field_length);
        override_usize(&lookup, MAX_PAYLOAD_BYTES_ENV, &mut self.max_payload_bytes);
        override_usize(&lookup, MAX_REDACT_DEPTH_ENV, &mut self.max_redact_depth);

        if let Some(raw) = lookup(SENSITIVE_COLLECTIONS_ENV) {
            self.sensitive_collections = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(bind) = lookup(BIND_ENV) {
            let bind = bind.trim();
            if !bind.is_empty() {
                self.bind_address = bind.to_string();
            }
        }
    }
}

fn override_usize<F>(lookup: &F, key: &str, target: &mut usize)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };

    match raw.trim().parse::<usize>() {
        Ok(value) => *target = value,
        Err(e) => tracing::warn!(key, value = %raw, error = %e, "ignoring unparsable setting override"),
    }
}
