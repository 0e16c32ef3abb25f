//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod filters;
pub mod query;
pub mod record;
pub mod serve;

pub use export::{handle_export_command, ExportArgs};
pub use filters::FilterArgs;
pub use query::{handle_list_command, handle_show_command, ListArgs};
pub use record::{handle_record_command, RecordArgs};
pub use serve::{handle_serve_command, ServeArgs};
