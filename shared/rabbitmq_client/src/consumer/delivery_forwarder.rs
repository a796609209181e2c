use super::delivery::Delivery;
use amqprs::{channel::Channel, consumer::AsyncConsumer, BasicProperties, Deliver};
use async_trait::async_trait;
use tokio::sync::mpsc;

///
/// Pushes every delivery into the buffer read by [super::RabbitmqConsumer::poll].
///
#[derive(Clone)]
pub struct DeliveryForwarder {
    deliveries_tx: mpsc::Sender<Delivery>,
    auto_ack: bool,
}

impl DeliveryForwarder {
    pub fn new(deliveries_tx: mpsc::Sender<Delivery>, auto_ack: bool) -> Self {
        Self {
            deliveries_tx,
            auto_ack,
        }
    }
}

#[async_trait]
impl AsyncConsumer for DeliveryForwarder {
    async fn consume(
        &mut self,
        channel: &Channel,
        deliver: Deliver,
        _basic_properties: BasicProperties,
        content: Vec<u8>,
    ) {
        let delivery_tag = deliver.delivery_tag();
        tracing::trace!(target: "rabbitmq_client::consumer", delivery_tag, "received delivery");

        let delivery = Delivery::new(channel.clone(), &deliver, self.auto_ack, content);
        if self.deliveries_tx.send(delivery).await.is_err() {
            tracing::debug!(
                target: "rabbitmq_client::consumer",
                delivery_tag,
                "consumer closed, delivery left unacknowledged"
            );
        }
    }
}
