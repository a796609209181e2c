use amqprs::{
    channel::{BasicAckArguments, Channel},
    AmqpDeliveryTag, Deliver,
};

///
/// Single message received from the queue.
///
/// Remembers the channel it arrived on, because acknowledgement
/// is only valid on that channel.
///
pub struct Delivery {
    channel: Channel,
    delivery_tag: AmqpDeliveryTag,
    routing_key: String,
    redelivered: bool,
    auto_ack: bool,
    content: Vec<u8>,
}

impl Delivery {
    pub(super) fn new(channel: Channel, deliver: &Deliver, auto_ack: bool, content: Vec<u8>) -> Self {
        Self {
            channel,
            delivery_tag: deliver.delivery_tag(),
            routing_key: deliver.routing_key().to_owned(),
            redelivered: deliver.redelivered(),
            auto_ack,
            content,
        }
    }

    pub fn delivery_tag(&self) -> AmqpDeliveryTag {
        self.delivery_tag
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn redelivered(&self) -> bool {
        self.redelivered
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    ///
    /// Acknowledges the delivery. No-op when the subscription uses auto ack.
    ///
    /// ### Errors
    /// Fails when the channel the delivery arrived on is already closed.
    /// The broker will redeliver such message.
    ///
    pub async fn commit(&self) -> Result<(), amqprs::error::Error> {
        if self.auto_ack {
            return Ok(());
        }

        let args = BasicAckArguments::new(self.delivery_tag, false);
        self.channel.basic_ack(args).await
    }
}
