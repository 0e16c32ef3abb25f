//! hrm-audit - audit trail engine for the HR management backend
//!
//! Mutation handlers describe what happened to a document; this crate turns
//! that description into an immutable audit record with personal data
//! masked, changed fields listed, and oversized payloads dropped, then
//! stores it without ever failing the mutation. Stored records can be
//! listed, filtered and exported through an HTTP API and a CLI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `audit`: Redaction, diffing, collection policy, bounding, messages and
//!   the recorder
//! - `storage`: Append-only record stores (JSONL file, in-memory)
//! - `query`: Filters, ordering and pagination
//! - `services`: Async query layer over a store
//! - `server`: HTTP query API
//! - `cli`, `display`, `export`: Command-line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use hrm_audit::config::{AuditPaths, Settings};
//! use hrm_audit::storage::open_store;
//! use hrm_audit::audit::AuditRecorder;
//!
//! let paths = AuditPaths::new()?;
//! let settings = Settings::load(&paths)?;
//! let recorder = AuditRecorder::from_settings(Arc::new(open_store(&paths)?), &settings);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod query;
pub mod server;
pub mod services;
pub mod storage;

pub use error::{AuditError, AuditResult};
