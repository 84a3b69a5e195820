//! Process termination signals.

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = term.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Like [`shutdown_signal`], but never resolves if handlers cannot be
/// installed, so the caller keeps running instead of stopping at once.
pub async fn interrupted() {
    if let Err(e) = shutdown_signal().await {
        tracing::error!(error = %e, "Cannot install signal handlers");
        std::future::pending::<()>().await;
    }
    tracing::info!("Termination signal received");
}
