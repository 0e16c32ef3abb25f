//! Configuration module for hrm-audit
//!
//! - Path resolution for the settings file and audit log
//! - Engine limits, redaction patterns and sensitive collections
//! - Environment overrides applied on top of the settings file

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::{RedactionPatterns, Settings};
