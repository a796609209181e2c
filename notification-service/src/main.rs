mod application;
mod dto;
mod error;
mod grpc;
mod metrics;
mod protobuf;
mod repository;
mod service;

use application::ApplicationEnv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    {
        // Ignore error because .env file is not required
        // as long as env variables are set
        let _ = dotenvy::dotenv();
    }

    let env = ApplicationEnv::parse()?;

    application::setup_tracing(&env)?;

    let (state, state_to_close) = application::create_state(&env).await?;

    let metrics_server = application::spawn_metrics_server(&env, &state).await?;

    let result = application::run_grpc_server(&env, state).await;
    if let Err(err) = &result {
        tracing::error!(%err, "grpc server failed");
    }

    application::close(state_to_close).await;
    metrics_server.abort();

    tracing::info!("shutdown finished");

    result
}
