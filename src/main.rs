//! Project REST API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ request ID ─▶ HTTP span ─▶ timeout ─▶ axum router
//!                                                              │
//!                                                              ▼
//!                                                  operation span (per handler)
//!                                                              │
//!                                                              ▼
//!                                              projects handler (lookup-or-404)
//!                                                              │
//!                                                              ▼
//!                                              ProjectRepository (sqlx SQLite)
//!     Client Response                                          │
//!     ◀──────────────── JSON body / {"error": ...} ◀───────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use project_api::lifecycle::{startup, Shutdown};
use project_api::observability::logging;

#[derive(Parser)]
#[command(name = "project-api")]
#[command(about = "REST API for managing projects", long_about = None)]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = startup::configuration(args.config.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!("project-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let (server, listener) = startup::prepare(config).await?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
