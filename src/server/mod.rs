//! Read-only HTTP API over the audit log
//!
//! - `GET /audits` lists records with filters and pagination
//! - `GET /audits/:id` returns one record
//! - `GET /healthz` liveness probe

pub mod handlers;

use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::error::{AuditError, AuditResult};
use crate::services::AuditService;

pub use handlers::{ApiError, ListParams};

/// Build the router for the query API
pub fn router(service: AuditService) -> Router {
    Router::new()
        .route("/audits", get(handlers::list_audits))
        .route("/audits/:id", get(handlers::get_audit))
        .route("/healthz", get(handlers::healthz))
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(service: AuditService, addr: &str) -> AuditResult<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| AuditError::Config(format!("Invalid bind address '{}': {}", addr, e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AuditError::Io(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(%addr, "audit query API listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AuditError::Io(format!("Server error: {}", e)))?;

    tracing::info!("audit query API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
