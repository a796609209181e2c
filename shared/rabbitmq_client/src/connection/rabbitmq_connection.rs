use super::{
    connection_callback::ConnectionCallback, dto::RabbitmqConnectionConfig,
    state_machine::StateMachine,
};
use amqprs::connection::{Connection, OpenConnectionArguments};
use std::sync::Arc;
use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};

///
/// Shared RabbitMQ connection.
///
/// A background task reopens the connection whenever network IO fails.
/// While the connection is being restored [Self::connection] yields `None`.
///
#[derive(Clone)]
pub struct RabbitmqConnection {
    inner: Arc<RabbitmqConnectionInner>,
}

struct RabbitmqConnectionInner {
    config: RabbitmqConnectionConfig,
    connection_rx: watch::Receiver<Option<Connection>>,

    keep_alive_handle: JoinHandle<()>,
    stop: Arc<Notify>,
}

impl RabbitmqConnection {
    #[tracing::instrument(
        name = "RabbitMQ Connection",
        target = "rabbitmq_client::connection",
        skip_all
    )]
    pub async fn new(
        config: RabbitmqConnectionConfig,
        open_connection_args: OpenConnectionArguments,
    ) -> Result<Self, amqprs::error::Error> {
        tracing::info!("opening connection");
        let connection = Connection::open(&open_connection_args).await?;
        connection.register_callback(ConnectionCallback).await?;

        let (connection_tx, connection_rx) = watch::channel(Some(connection.clone()));
        let state_machine = StateMachine::new(
            config.clone(),
            open_connection_args,
            connection,
            connection_tx,
        );

        let stop = Arc::new(Notify::new());
        let keep_alive_handle = tokio::spawn(state_machine.run(Arc::clone(&stop)));

        tracing::info!("connection opened");

        Ok(Self {
            inner: Arc::new(RabbitmqConnectionInner {
                config,
                connection_rx,
                keep_alive_handle,
                stop,
            }),
        })
    }

    ///
    /// Stops the keep alive task and closes the connection.
    /// Does nothing but log an error when other clones are still alive,
    /// so consumers must be closed first.
    ///
    pub async fn close(self) {
        let Ok(inner) = Arc::try_unwrap(self.inner) else {
            tracing::error!("connection is still in use, refusing to close it");
            return;
        };

        inner.stop.notify_one();
        if let Err(err) = inner.keep_alive_handle.await {
            tracing::error!(%err, "keep alive task failed");
        }
    }

    pub fn config(&self) -> &RabbitmqConnectionConfig {
        &self.inner.config
    }

    pub fn connection(&self) -> watch::Receiver<Option<Connection>> {
        self.inner.connection_rx.clone()
    }
}
