use super::ApplicationEnv;
use crate::{
    grpc::NotificationsGrpcService,
    metrics::{MetricsProvider, PrometheusMetrics},
    repository::NotificationsRepositoryImpl,
    service::{
        notifications_consumer_service::{
            NotificationsConsumerService, NotificationsConsumerServiceConfig,
        },
        notifications_service::NotificationsServiceImpl,
        users_service::GrpcUsersService,
    },
};
use amqprs::connection::OpenConnectionArguments;
use prometheus::Registry;
use rabbitmq_client::{RabbitmqConnection, RabbitmqConnectionConfig};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

pub struct ApplicationState {
    pub grpc_service: NotificationsGrpcService,
    pub registry: Registry,
}

pub struct ApplicationStateToClose {
    pub db_pool: PgPool,
    pub rabbitmq_connection: RabbitmqConnection,
    pub notifications_consumer_service: NotificationsConsumerService,
    pub metrics: Arc<dyn MetricsProvider>,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("creating metrics");
    let registry = Registry::new();
    let metrics = PrometheusMetrics::new(&registry)?;
    let metrics: Arc<dyn MetricsProvider> = Arc::new(metrics);

    tracing::info!("connecting to database");
    let db_pool = PgPoolOptions::new()
        .max_connections(env.db_max_connections)
        .connect(&env.db_connection_string)
        .await?;

    tracing::info!("creating repositories");
    let notifications_repository =
        NotificationsRepositoryImpl::new(db_pool.clone(), metrics.clone()).await?;
    let notifications_repository = Arc::new(notifications_repository);

    tracing::info!("creating services");
    let users_service = GrpcUsersService::new(&env.user_service_url, env.user_service_timeout)?;
    let users_service = Arc::new(users_service);

    let notifications_service =
        NotificationsServiceImpl::new(notifications_repository, users_service, metrics.clone());
    let notifications_service = Arc::new(notifications_service);

    tracing::info!("connecting to rabbitmq");
    let config = RabbitmqConnectionConfig {
        retry_interval: env.rabbitmq_retry_interval,
    };
    let open_connection_args =
        OpenConnectionArguments::try_from(env.rabbitmq_connection_string.as_str())?;
    let rabbitmq_connection = RabbitmqConnection::new(config, open_connection_args).await?;

    let config = NotificationsConsumerServiceConfig {
        exchange: env.rabbitmq_events_exchange_name.clone(),
        queue: env.rabbitmq_events_queue_name.clone(),
        binding_key: env.rabbitmq_events_binding_key.clone(),
        auto_ack: env.rabbitmq_auto_ack,
        prefetch_count: env.rabbitmq_prefetch_count,
        poll_timeout: env.rabbitmq_poll_timeout,
    };
    let notifications_consumer_service = NotificationsConsumerService::start(
        config,
        rabbitmq_connection.clone(),
        notifications_service.clone(),
        metrics.clone(),
    )
    .await;

    let grpc_service = NotificationsGrpcService::new(notifications_service, metrics.clone());
    metrics.set_health(true);

    Ok((
        ApplicationState {
            grpc_service,
            registry,
        },
        ApplicationStateToClose {
            db_pool,
            rabbitmq_connection,
            notifications_consumer_service,
            metrics,
        },
    ))
}
