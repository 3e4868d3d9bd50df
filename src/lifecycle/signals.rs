//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and SIGTERM both end the server gracefully; so does the
//! in-process `Shutdown` trigger.

use tokio::signal;
use tokio::sync::broadcast;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn terminate() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = sigterm => {},
    }
}

/// Resolves on an OS signal or when `trigger` fires (or its sender is dropped).
pub async fn shutdown_requested(mut trigger: broadcast::Receiver<()>) {
    tokio::select! {
        _ = terminate() => {},
        _ = trigger.recv() => {
            tracing::info!("Shutdown triggered");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_resolves_shutdown() {
        let shutdown = Shutdown::new();
        let waiter = tokio::spawn(shutdown_requested(shutdown.subscribe()));

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("shutdown did not resolve")
            .unwrap();
    }
}
