use super::{
    channel_callback::ChannelCallback, delivery_forwarder::DeliveryForwarder,
    subscription::Subscription,
};
use crate::{retry::retry, RabbitmqConnection};
use amqprs::{
    channel::{BasicCancelArguments, Channel},
    connection::Connection,
};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

///
/// Opens a channel with a callback that notifies `restore`
/// once the channel or the consumer on it stops working.
///
pub async fn open_channel(
    connection: &Connection,
) -> Result<(Channel, Arc<Notify>), amqprs::error::Error> {
    let channel = connection.open_channel(None).await?;

    let restore = Arc::new(Notify::new());
    let callback = ChannelCallback::new(Arc::clone(&restore));
    if let Err(err) = channel.register_callback(callback).await {
        let _ = channel.close().await;
        return Err(err);
    }

    Ok((channel, restore))
}

pub struct StateMachine {
    rabbitmq_connection: RabbitmqConnection,
    connection_rx: watch::Receiver<Option<Connection>>,
    connection: Option<Connection>,

    channel: Channel,
    restore: Arc<Notify>,

    subscription: Subscription,
    forwarder: DeliveryForwarder,

    state: State,
}

enum State {
    Consuming,
    WaitingForConnection,
    OpeningChannel,
    Subscribing,
}

impl StateMachine {
    pub fn new(
        rabbitmq_connection: RabbitmqConnection,
        connection_rx: watch::Receiver<Option<Connection>>,
        connection: Connection,
        channel: Channel,
        restore: Arc<Notify>,
        subscription: Subscription,
        forwarder: DeliveryForwarder,
    ) -> Self {
        Self {
            rabbitmq_connection,
            connection_rx,
            connection: Some(connection),
            channel,
            restore,
            subscription,
            forwarder,
            state: State::Consuming,
        }
    }

    ///
    /// Keeps the subscription alive until `stop` is notified,
    /// then cancels the consumer and closes its channel.
    ///
    #[tracing::instrument(
        name = "RabbitMQ Consumer",
        target = "rabbitmq_client::consumer",
        skip_all,
        fields(queue = %self.subscription.queue)
    )]
    pub async fn run(mut self, stop: Arc<Notify>) {
        tracing::info!("keep alive started");

        tokio::select! {
            biased;

            _ = stop.notified() => {}
            _ = self.keep_alive() => {}
        }

        let args = BasicCancelArguments::new(&self.subscription.consumer_tag);
        match self.channel.basic_cancel(args).await {
            Ok(_) => tracing::info!("consumer cancelled"),
            Err(err) => tracing::warn!(%err, "failed to cancel consumer"),
        }

        match self.channel.close().await {
            Ok(()) => tracing::info!("channel closed"),
            Err(err) => tracing::warn!(%err, "failed to close channel"),
        }

        tracing::info!("keep alive finished");
    }

    async fn keep_alive(&mut self) {
        loop {
            self.state = match self.state {
                State::Consuming => self.consuming().await,
                State::WaitingForConnection => self.waiting_for_connection().await,
                State::OpeningChannel => self.opening_channel().await,
                State::Subscribing => self.subscribing().await,
            };
        }
    }

    async fn consuming(&mut self) -> State {
        tracing::info!("state: Consuming");

        tokio::select! {
            biased;

            _ = self.connection_rx.changed() => {
                tracing::info!("connection changed");
                State::WaitingForConnection
            }
            _ = self.restore.notified() => State::OpeningChannel,
        }
    }

    async fn waiting_for_connection(&mut self) -> State {
        tracing::info!("state: WaitingForConnection");

        loop {
            self.connection = self.connection_rx.borrow_and_update().clone();
            if self.connection.is_some() {
                return State::OpeningChannel;
            }

            if self.connection_rx.changed().await.is_err() {
                // Unreachable while this state machine holds a clone of the connection
                tracing::error!("connection closed permanently");
                std::future::pending::<()>().await;
            }
        }
    }

    async fn opening_channel(&mut self) -> State {
        tracing::info!("state: OpeningChannel");

        if let Err(err) = self.channel.clone().close().await {
            tracing::debug!(%err, "failed to close previous channel");
        }

        let Some(connection) = self.connection.as_ref() else {
            return State::WaitingForConnection;
        };
        let retry_interval = self.rabbitmq_connection.config().retry_interval;

        tokio::select! {
            biased;

            _ = self.connection_rx.changed() => {
                tracing::info!("connection changed");
                State::WaitingForConnection
            }
            (channel, restore) = retry(
                retry_interval,
                "open channel",
                || open_channel(connection),
            ) => {
                self.channel = channel;
                self.restore = restore;
                State::Subscribing
            }
        }
    }

    async fn subscribing(&mut self) -> State {
        tracing::info!("state: Subscribing");

        let retry_interval = self.rabbitmq_connection.config().retry_interval;

        tokio::select! {
            biased;

            _ = self.connection_rx.changed() => {
                tracing::info!("connection changed");
                State::WaitingForConnection
            }
            result = self.subscription.apply(&self.channel, self.forwarder.clone()) => {
                match result {
                    Ok(()) => State::Consuming,
                    Err(err) => {
                        tracing::warn!(%err, "failed to restore subscription");
                        tokio::time::sleep(retry_interval).await;
                        State::OpeningChannel
                    }
                }
            }
        }
    }
}
