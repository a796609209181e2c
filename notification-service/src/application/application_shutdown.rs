use super::ApplicationStateToClose;

///
/// Releases resources in reverse order of their creation.
/// Consumer is stopped first so no message is processed with a closed pool.
///
pub async fn close(mut state: ApplicationStateToClose) {
    state.metrics.set_health(false);

    tracing::info!("closing notifications consumer");
    if !state.notifications_consumer_service.is_running() {
        tracing::warn!("notifications consumer was not running");
    }
    state.notifications_consumer_service.close().await;

    tracing::info!("closing rabbitmq connection");
    state.rabbitmq_connection.close().await;

    tracing::info!("closing connection with database");
    state.db_pool.close().await;
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("starting shutdown");
}
