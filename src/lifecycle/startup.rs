//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Open the store and make sure its table exists
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::store::{SqliteProjectRepository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot open project store: {0}")]
    Store(#[from] StoreError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration from `path`, or the defaults when no file is given.
pub fn configuration(path: Option<&Path>) -> Result<ServiceConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(ServiceConfig::default()),
    }
}

/// Build every subsystem and bind the listener.
pub async fn prepare(config: ServiceConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let repository = SqliteProjectRepository::connect(&config.database).await?;
    repository.bootstrap().await?;
    tracing::info!(
        url = %config.database.url,
        max_connections = config.database.max_connections,
        "Project store ready"
    );

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let server = HttpServer::new(config, Arc::new(repository));
    Ok((server, listener))
}
