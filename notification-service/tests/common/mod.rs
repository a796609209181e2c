#![allow(dead_code)]

use amqprs::{
    channel::{BasicPublishArguments, ExchangeDeclareArguments, ExchangeType},
    connection::{Connection, OpenConnectionArguments},
    BasicProperties,
};
use protobuf::notification_service_client::NotificationServiceClient;
use std::sync::Once;
use tonic::transport::Channel;

pub mod protobuf {
    tonic::include_proto!("notification.v1");
}

static INIT_ENV_ONCE: Once = Once::new();

pub fn init_env() {
    INIT_ENV_ONCE.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

pub fn address() -> String {
    std::env::var("NOTIFICATION_SERVICE_GRPC_BIND_ADDRESS").unwrap()
}

///
/// User that must exist in user service, otherwise saving notification fails
///
pub fn existing_user_id() -> i64 {
    std::env::var("NOTIFICATION_SERVICE_TEST_EXISTING_USER_ID")
        .unwrap()
        .parse()
        .unwrap()
}

pub async fn create_client() -> NotificationServiceClient<Channel> {
    NotificationServiceClient::connect(format!("http://{}", address()))
        .await
        .unwrap()
}

pub async fn publish_event(content: String) {
    let connection_string =
        std::env::var("NOTIFICATION_SERVICE_RABBITMQ_CONNECTION_STRING").unwrap();
    let exchange = std::env::var("NOTIFICATION_SERVICE_RABBITMQ_EVENTS_EXCHANGE_NAME")
        .unwrap_or("relation-events".to_string());

    let args = OpenConnectionArguments::try_from(connection_string.as_str()).unwrap();
    let connection = Connection::open(&args).await.unwrap();
    let channel = connection.open_channel(None).await.unwrap();

    let args = ExchangeDeclareArguments::of_type(&exchange, ExchangeType::Topic)
        .durable(true)
        .finish();
    channel.exchange_declare(args).await.unwrap();

    let args = BasicPublishArguments::new(&exchange, "follow.created");
    channel
        .basic_publish(BasicProperties::default(), content.into_bytes(), args)
        .await
        .unwrap();

    channel.close().await.unwrap();
    connection.close().await.unwrap();
}
