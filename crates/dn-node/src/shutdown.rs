//! Process termination signal.

use tracing::{error, info};

/// Resolve when the process is asked to terminate.
///
/// On Unix this is SIGTERM or SIGHUP. Elsewhere it is Ctrl-C. If no handler
/// can be installed the future never resolves.
pub async fn termination_signal() {
    wait_for_signal().await;
    info!("Server shutdown request received!");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut term, mut hup) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(term), Ok(hup)) => (term, hup),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "failed to install signal handlers");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = term.recv() => {}
        _ = hup.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
