//! `serve` command

use clap::Args;

use crate::config::Settings;
use crate::error::AuditResult;
use crate::server;
use crate::services::AuditService;

/// Arguments for `serve`
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides bind_address)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Handle the `serve` command
pub async fn handle_serve_command(
    service: AuditService,
    settings: &Settings,
    args: ServeArgs,
) -> AuditResult<()> {
    let bind = args.bind.unwrap_or_else(|| settings.bind_address.clone());
    println!("Serving the audit query API on http://{}", bind);
    println!("Press Ctrl-C to stop.");
    server::serve(service, &bind).await
}
