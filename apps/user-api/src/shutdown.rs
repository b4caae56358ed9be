use std::time::Duration;
use tokio::{signal, sync::oneshot};

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Resolves `timeout` after shutdown has been signalled on `started`.
/// Never resolves if the sender is dropped without signalling.
pub async fn drain_deadline(started: oneshot::Receiver<()>, timeout: Duration) {
    if started.await.is_err() {
        return std::future::pending().await;
    }
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "allowing in-flight requests to drain"
    );
    tokio::time::sleep(timeout).await;
}
