use super::{connection_callback::ConnectionCallback, RabbitmqConnectionConfig};
use crate::retry::retry;
use amqprs::connection::{Connection, OpenConnectionArguments};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

pub struct StateMachine {
    config: RabbitmqConnectionConfig,
    open_connection_args: OpenConnectionArguments,

    connection: Connection,
    connection_tx: watch::Sender<Option<Connection>>,

    state: State,
}

enum State {
    Connected,
    Reconnecting,
}

impl StateMachine {
    pub fn new(
        config: RabbitmqConnectionConfig,
        open_connection_args: OpenConnectionArguments,
        connection: Connection,
        connection_tx: watch::Sender<Option<Connection>>,
    ) -> Self {
        Self {
            config,
            open_connection_args,
            connection,
            connection_tx,
            state: State::Connected,
        }
    }

    ///
    /// Keeps connection alive until `stop` is notified,
    /// then closes the current connection.
    ///
    #[tracing::instrument(
        name = "RabbitMQ Connection",
        target = "rabbitmq_client::connection",
        skip_all
    )]
    pub async fn run(mut self, stop: Arc<Notify>) {
        tracing::info!("keep alive started");

        tokio::select! {
            biased;

            _ = stop.notified() => {}
            _ = self.keep_alive() => {}
        }

        self.connection_tx.send_replace(None);
        match self.connection.close().await {
            Ok(()) => tracing::info!("connection closed"),
            Err(err) => tracing::warn!(%err, "failed to close connection"),
        }

        tracing::info!("keep alive finished");
    }

    async fn keep_alive(&mut self) {
        loop {
            self.state = match self.state {
                State::Connected => self.connected().await,
                State::Reconnecting => self.reconnecting().await,
            };
        }
    }

    async fn connected(&mut self) -> State {
        tracing::info!("state: Connected");

        self.connection.listen_network_io_failure().await;
        tracing::warn!("network failure detected");

        // Consumers stop using the connection as soon as None is published
        self.connection_tx.send_replace(None);
        if let Err(err) = self.connection.clone().close().await {
            tracing::debug!(%err, "failed to close broken connection");
        }

        State::Reconnecting
    }

    async fn reconnecting(&mut self) -> State {
        tracing::info!("state: Reconnecting");

        let open_connection_args = &self.open_connection_args;
        self.connection = retry(self.config.retry_interval, "reopen connection", || async move {
            let connection = Connection::open(open_connection_args).await?;
            if let Err(err) = connection.register_callback(ConnectionCallback).await {
                let _ = connection.close().await;
                return Err(err);
            }

            Ok::<_, amqprs::error::Error>(connection)
        })
        .await;

        tracing::info!("connection reopened");
        self.connection_tx
            .send_replace(Some(self.connection.clone()));

        State::Connected
    }
}
