//! Display formatting for terminal output
//!
//! Provides utilities for formatting audit records for terminal display.

pub mod audit;

pub use audit::{format_audit_details, format_audit_page};
