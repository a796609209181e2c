use async_trait::async_trait;
use rabbitmq_client::{Delivery, PollError, RabbitmqConsumer};
use std::time::Duration;

///
/// Source of events read by the consumer loop.
///
#[async_trait]
pub trait EventsQueue: Send {
    type Message: QueueMessage;

    ///
    /// ### Errors
    /// - [PollError::Timeout] when nothing arrived within `timeout`
    /// - [PollError::Closed] when queue won't produce any more messages
    ///
    async fn poll(&mut self, timeout: Duration) -> Result<Self::Message, PollError>;

    async fn close(&mut self);
}

#[async_trait]
pub trait QueueMessage: Send + Sync {
    fn delivery_tag(&self) -> u64;

    fn content(&self) -> &[u8];

    ///
    /// Tells the queue the message was handled and must not be redelivered
    ///
    async fn commit(&self) -> anyhow::Result<()>;
}

#[async_trait]
impl EventsQueue for RabbitmqConsumer {
    type Message = Delivery;

    async fn poll(&mut self, timeout: Duration) -> Result<Delivery, PollError> {
        RabbitmqConsumer::poll(self, timeout).await
    }

    async fn close(&mut self) {
        RabbitmqConsumer::close(self).await;
    }
}

#[async_trait]
impl QueueMessage for Delivery {
    fn delivery_tag(&self) -> u64 {
        Delivery::delivery_tag(self)
    }

    fn content(&self) -> &[u8] {
        Delivery::content(self)
    }

    async fn commit(&self) -> anyhow::Result<()> {
        Ok(Delivery::commit(self).await?)
    }
}
