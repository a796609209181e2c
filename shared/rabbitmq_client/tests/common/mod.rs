use amqprs::{
    channel::{BasicPublishArguments, Channel, QueueDeleteArguments},
    connection::{Connection, OpenConnectionArguments},
    BasicProperties,
};
use rabbitmq_client::{RabbitmqConnection, RabbitmqConnectionConfig, Subscription};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

pub fn init_test_environment() {
    // read envs from .env file
    dotenvy::dotenv().unwrap();

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_target(false)
        .with_test_writer()
        .init();
}

pub async fn create_connection() -> Connection {
    let uri = std::env::var("TEST_RABBITMQ_CONNECTION_URI").unwrap();
    let args = OpenConnectionArguments::try_from(uri.as_str()).unwrap();

    Connection::open(&args).await.unwrap()
}

pub async fn create_rabbitmq_connection() -> RabbitmqConnection {
    let uri = std::env::var("TEST_RABBITMQ_CONNECTION_URI").unwrap();
    let retry_interval = std::env::var("TEST_RETRY_INTERVAL")
        .unwrap()
        .parse()
        .unwrap();

    let config = RabbitmqConnectionConfig {
        retry_interval: Duration::from_secs(retry_interval),
    };
    let args = OpenConnectionArguments::try_from(uri.as_str()).unwrap();

    RabbitmqConnection::new(config, args).await.unwrap()
}

pub fn subscription(name: &str, auto_ack: bool) -> Subscription {
    Subscription {
        exchange: format!("test {name}"),
        queue: format!("test {name}"),
        binding_key: "#".to_string(),
        consumer_tag: uuid::Uuid::new_v4().to_string(),
        auto_ack,
        prefetch_count: 10,
    }
}

pub async fn publish(channel: &Channel, exchange: &str, content: &[u8]) {
    let args = BasicPublishArguments::new(exchange, "test.event");
    channel
        .basic_publish(BasicProperties::default(), content.to_vec(), args)
        .await
        .unwrap();
}

pub async fn delete_queue(channel: &Channel, queue: &str) {
    let args = QueueDeleteArguments::new(queue);
    channel.queue_delete(args).await.unwrap();
}
