use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hrm_audit::audit::AuditRecorder;
use hrm_audit::cli::{
    handle_export_command, handle_list_command, handle_record_command, handle_serve_command,
    handle_show_command, ExportArgs, ListArgs, RecordArgs, ServeArgs,
};
use hrm_audit::config::{AuditPaths, Settings};
use hrm_audit::services::AuditService;
use hrm_audit::storage::{open_store, AuditStore};

/// Environment variable holding the log filter
const LOG_ENV: &str = "HRM_AUDIT_LOG";

#[derive(Parser)]
#[command(
    name = "hrm-audit",
    author = "Kaylee Beyene",
    version,
    about = "Audit trail engine for the HR management backend",
    long_about = "hrm-audit records redacted, size-bounded audit entries for HR data \
                  mutations and lets administrators list, inspect, export and serve \
                  them over HTTP."
)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default settings to the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Record one audit entry
    Record(RecordArgs),

    /// List audit records, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one audit record in detail
    Show {
        /// Record ID (full UUID or aud-xxxxxxxx)
        id: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export audit records
    Export(ExportArgs),

    /// Serve the read-only HTTP query API
    Serve(ServeArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };

    let filter = if verbose || quiet {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Initialize paths and settings
    let paths = AuditPaths::new()?;
    let settings = Settings::load(&paths)?;

    let Some(command) = cli.command else {
        println!("hrm-audit - audit trail engine for HR data");
        println!();
        println!("Run 'hrm-audit --help' for usage information.");
        println!("Run 'hrm-audit init' to write default settings.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing hrm-audit at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            let store = open_store(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Settings file: {}", paths.settings_file().display());
            println!("Audit log:     {}", store.path().display());
        }
        Commands::Config => {
            println!("hrm-audit Configuration");
            println!("=======================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Max change entries:    {}", settings.max_change_entries);
            println!("  Max field length:      {}", settings.max_field_length);
            println!("  Max payload bytes:     {}", settings.max_payload_bytes);
            println!("  Max redaction depth:   {}", settings.max_redact_depth);
            println!(
                "  Sensitive collections: {}",
                settings
                    .sensitive_collections
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  Default page limit:    {}", settings.default_page_limit);
            println!("  Max page limit:        {}", settings.max_page_limit);
            println!("  Bind address:          {}", settings.bind_address);
        }
        command => {
            let store: Arc<dyn AuditStore> = Arc::new(open_store(&paths)?);
            let service = AuditService::from_settings(Arc::clone(&store), &settings);

            match command {
                Commands::Record(args) => {
                    let recorder = AuditRecorder::from_settings(store, &settings);
                    handle_record_command(&recorder, args).await?;
                }
                Commands::List(args) => handle_list_command(&service, args).await?,
                Commands::Show { id, json } => handle_show_command(&service, &id, json).await?,
                Commands::Export(args) => handle_export_command(&service, args).await?,
                Commands::Serve(args) => handle_serve_command(service, &settings, args).await?,
                Commands::Init | Commands::Config => {}
            }
        }
    }

    Ok(())
}
