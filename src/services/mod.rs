//! Service layer for hrm-audit
//!
//! Services sit between the outer surfaces (HTTP, CLI) and the store,
//! handling validation and moving blocking I/O off the async runtime.

pub mod audit;

pub use audit::AuditService;
