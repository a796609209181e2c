use super::{
    delivery::Delivery,
    delivery_forwarder::DeliveryForwarder,
    error::PollError,
    state_machine::{open_channel, StateMachine},
    subscription::Subscription,
};
use crate::RabbitmqConnection;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Notify},
    task::JoinHandle,
};

pub struct RabbitmqConsumer {
    deliveries_rx: mpsc::Receiver<Delivery>,
    keep_alive: Option<KeepAlive>,
}

struct KeepAlive {
    handle: JoinHandle<()>,
    stop: Arc<Notify>,
}

impl RabbitmqConsumer {
    ///
    /// Declares exchange and queue described by `subscription`
    /// and starts consuming.
    ///
    /// ### Errors
    /// Fails when the connection is being restored or any declaration
    /// is rejected by the broker. Nothing is retried here.
    ///
    #[tracing::instrument(
        name = "RabbitMQ Consumer",
        target = "rabbitmq_client::consumer",
        skip_all,
        fields(queue = %subscription.queue)
    )]
    pub async fn new(
        rabbitmq_connection: RabbitmqConnection,
        subscription: Subscription,
    ) -> anyhow::Result<Self> {
        tracing::info!("starting consumer");

        let mut connection_rx = rabbitmq_connection.connection();
        let Some(connection) = connection_rx.borrow_and_update().clone() else {
            anyhow::bail!("connection is being restored");
        };

        let (channel, restore) = open_channel(&connection).await?;

        let buffer_len = usize::from(subscription.prefetch_count.max(1));
        let (deliveries_tx, deliveries_rx) = mpsc::channel(buffer_len);
        let forwarder = DeliveryForwarder::new(deliveries_tx, subscription.auto_ack);

        if let Err(err) = subscription.apply(&channel, forwarder.clone()).await {
            let _ = channel.close().await;
            return Err(err.into());
        }

        let state_machine = StateMachine::new(
            rabbitmq_connection,
            connection_rx,
            connection,
            channel,
            restore,
            subscription,
            forwarder,
        );

        let stop = Arc::new(Notify::new());
        let handle = tokio::spawn(state_machine.run(Arc::clone(&stop)));

        tracing::info!("consumer started");

        Ok(Self {
            deliveries_rx,
            keep_alive: Some(KeepAlive { handle, stop }),
        })
    }

    ///
    /// Waits at most `timeout` for the next delivery.
    ///
    pub async fn poll(&mut self, timeout: Duration) -> Result<Delivery, PollError> {
        match tokio::time::timeout(timeout, self.deliveries_rx.recv()).await {
            Ok(Some(delivery)) => Ok(delivery),
            Ok(None) => Err(PollError::Closed),
            Err(_) => Err(PollError::Timeout),
        }
    }

    ///
    /// Cancels the consumer and closes its channel.
    /// Deliveries still buffered stay unacknowledged and will be redelivered.
    /// Calling it again does nothing.
    ///
    pub async fn close(&mut self) {
        let Some(keep_alive) = self.keep_alive.take() else {
            return;
        };

        tracing::info!("closing consumer");

        self.deliveries_rx.close();
        keep_alive.stop.notify_one();
        if let Err(err) = keep_alive.handle.await {
            tracing::error!(%err, "consumer keep alive task failed");
        }

        tracing::info!("consumer closed");
    }
}

impl Drop for RabbitmqConsumer {
    fn drop(&mut self) {
        if let Some(keep_alive) = &self.keep_alive {
            keep_alive.stop.notify_one();
        }
    }
}
