use super::{shutdown_signal, ApplicationEnv, ApplicationState};
use crate::{
    metrics::create_metrics_router,
    protobuf::notification::notification_service_server::NotificationServiceServer,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tonic::transport::Server;
use tower_http::trace::TraceLayer;

///
/// Serves gRPC API until shutdown signal is received.
///
pub async fn run_grpc_server(env: &ApplicationEnv, state: ApplicationState) -> anyhow::Result<()> {
    tracing::info!(address = %env.grpc_bind_address, "starting grpc server");

    Server::builder()
        .timeout(env.grpc_request_timeout)
        .layer(TraceLayer::new_for_grpc())
        .add_service(NotificationServiceServer::new(state.grpc_service))
        .serve_with_shutdown(env.grpc_bind_address, shutdown_signal())
        .await?;

    Ok(())
}

///
/// Binds metrics endpoint and serves it in background.
/// Task ends with an error when the server fails.
///
pub async fn spawn_metrics_server(
    env: &ApplicationEnv,
    state: &ApplicationState,
) -> anyhow::Result<JoinHandle<()>> {
    let listener = TcpListener::bind(env.metrics_bind_address).await?;
    tracing::info!(address = %env.metrics_bind_address, "starting metrics server");

    let router = create_metrics_router(state.registry.clone());
    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!(%err, "metrics server failed");
        }
    });

    Ok(handle)
}
