use super::delivery_forwarder::DeliveryForwarder;
use amqprs::channel::{
    BasicConsumeArguments, BasicQosArguments, Channel, ExchangeDeclareArguments, ExchangeType,
    QueueBindArguments, QueueDeclareArguments,
};

///
/// What the consumer listens to.
///
/// The exchange is a durable topic exchange and the queue is durable,
/// so every service instance sharing `queue` competes for the same messages.
///
#[derive(Debug, Clone)]
pub struct Subscription {
    pub exchange: String,
    pub queue: String,
    pub binding_key: String,

    /// Must be unique per channel, it's needed to cancel the consumer
    pub consumer_tag: String,
    pub auto_ack: bool,

    /// Max number of unacknowledged deliveries buffered by the consumer
    pub prefetch_count: u16,
}

impl Subscription {
    pub(super) async fn apply(
        &self,
        channel: &Channel,
        forwarder: DeliveryForwarder,
    ) -> Result<(), amqprs::error::Error> {
        tracing::info!(exchange = %self.exchange, "declaring exchange");
        let args = ExchangeDeclareArguments::of_type(&self.exchange, ExchangeType::Topic)
            .durable(true)
            .finish();
        channel.exchange_declare(args).await?;

        tracing::info!(queue = %self.queue, "declaring queue");
        let args = QueueDeclareArguments::new(&self.queue).durable(true).finish();
        channel.queue_declare(args).await?;

        tracing::info!(binding_key = %self.binding_key, "binding queue");
        let args = QueueBindArguments::new(&self.queue, &self.exchange, &self.binding_key);
        channel.queue_bind(args).await?;

        let args = BasicQosArguments::new(0, self.prefetch_count, false);
        channel.basic_qos(args).await?;

        tracing::info!(consumer_tag = %self.consumer_tag, "consuming");
        let mut args = BasicConsumeArguments::new(&self.queue, &self.consumer_tag);
        args.no_ack = self.auto_ack;
        channel.basic_consume(forwarder, args).await?;

        Ok(())
    }
}
