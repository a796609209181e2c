use amqprs::{
    callbacks, channel::Channel, Ack, BasicProperties, Cancel, CloseChannel, Nack, Return,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

///
/// Wakes up the consumer state machine when the broker cancels
/// the consumer or closes the channel.
///
pub struct ChannelCallback {
    restore: Arc<Notify>,
}

impl ChannelCallback {
    pub fn new(restore: Arc<Notify>) -> Self {
        Self { restore }
    }
}

#[async_trait]
impl callbacks::ChannelCallback for ChannelCallback {
    #[tracing::instrument(
        name = "RabbitMQ Channel Callback",
        target = "rabbitmq_client::consumer",
        skip_all
    )]
    async fn close(
        &mut self,
        _channel: &Channel,
        close: CloseChannel,
    ) -> Result<(), amqprs::error::Error> {
        tracing::error!(
            code = close.reply_code(),
            text = close.reply_text(),
            "server closed channel",
        );
        self.restore.notify_one();

        Ok(())
    }

    #[tracing::instrument(
        name = "RabbitMQ Channel Callback",
        target = "rabbitmq_client::consumer",
        skip_all
    )]
    async fn cancel(
        &mut self,
        _channel: &Channel,
        _cancel: Cancel,
    ) -> Result<(), amqprs::error::Error> {
        tracing::error!("server cancelled consumer");
        self.restore.notify_one();

        Ok(())
    }

    async fn flow(
        &mut self,
        _channel: &Channel,
        active: bool,
    ) -> Result<bool, amqprs::error::Error> {
        Ok(active)
    }

    // Channel is never used for publishing
    async fn publish_ack(&mut self, _channel: &Channel, _ack: Ack) {}

    async fn publish_nack(&mut self, _channel: &Channel, _nack: Nack) {}

    async fn publish_return(
        &mut self,
        _channel: &Channel,
        _ret: Return,
        _basic_properties: BasicProperties,
        _content: Vec<u8>,
    ) {
    }
}
