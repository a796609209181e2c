use amqprs::{connection::Connection, Close};
use async_trait::async_trait;

///
/// Logs server-side connection events.
/// Recovery itself is driven by the state machine, not by this callback.
///
#[derive(Clone, Copy)]
pub struct ConnectionCallback;

#[async_trait]
impl amqprs::callbacks::ConnectionCallback for ConnectionCallback {
    #[tracing::instrument(
        name = "RabbitMQ Connection Callback",
        target = "rabbitmq_client::connection",
        skip_all
    )]
    async fn close(
        &mut self,
        _connection: &Connection,
        close: Close,
    ) -> Result<(), amqprs::error::Error> {
        tracing::warn!(
            code = close.reply_code(),
            text = close.reply_text(),
            "server closed connection",
        );

        Ok(())
    }

    async fn blocked(&mut self, _connection: &Connection, reason: String) {
        tracing::warn!(target: "rabbitmq_client::connection", reason, "connection blocked");
    }

    async fn unblocked(&mut self, _connection: &Connection) {
        tracing::info!(target: "rabbitmq_client::connection", "connection unblocked");
    }
}
