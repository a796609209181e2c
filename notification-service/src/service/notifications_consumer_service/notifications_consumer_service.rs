use super::{
    EventsProcessor, EventsQueue, NotificationsConsumerServiceConfig, QueueMessage,
    UNKNOWN_EVENT_TYPE,
};
use crate::{
    error::Error, metrics::MetricsProvider, service::notifications_service::NotificationsService,
};
use futures_util::FutureExt;
use rabbitmq_client::{PollError, RabbitmqConnection, RabbitmqConsumer, Subscription};
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};
use tokio::{sync::Notify, task::JoinHandle, time::Instant};
use uuid::Uuid;

const CONSUME_OPERATION: &str = "consume";

///
/// Background loop reading relation events and turning them into notifications.
///
/// Every polled message is committed after processing regardless of the outcome,
/// failed messages are only logged.
///
pub struct NotificationsConsumerService {
    close_notify: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl NotificationsConsumerService {
    ///
    /// Subscribes to the events queue and spawns consumer loop.
    ///
    /// When subscription fails the error is logged and the service
    /// stays idle, so the rest of the application keeps working.
    ///
    pub async fn start(
        config: NotificationsConsumerServiceConfig,
        rabbitmq_connection: RabbitmqConnection,
        notifications_service: Arc<dyn NotificationsService>,
        metrics: Arc<dyn MetricsProvider>,
    ) -> Self {
        let subscription = Subscription {
            exchange: config.exchange.clone(),
            queue: config.queue.clone(),
            binding_key: config.binding_key.clone(),
            consumer_tag: format!("{}_{}", config.queue, Uuid::new_v4()),
            auto_ack: config.auto_ack,
            prefetch_count: config.prefetch_count,
        };

        match RabbitmqConsumer::new(rabbitmq_connection, subscription).await {
            Ok(consumer) => {
                tracing::info!(
                    exchange = %config.exchange,
                    queue = %config.queue,
                    "consumer started"
                );
                Self::spawn(config, consumer, notifications_service, metrics)
            }
            Err(err) => {
                tracing::error!(%err, "failed to start consumer");
                Self {
                    close_notify: Arc::new(Notify::new()),
                    handle: None,
                }
            }
        }
    }

    pub fn spawn<Q>(
        config: NotificationsConsumerServiceConfig,
        queue: Q,
        notifications_service: Arc<dyn NotificationsService>,
        metrics: Arc<dyn MetricsProvider>,
    ) -> Self
    where
        Q: EventsQueue + 'static,
    {
        let close_notify = Arc::new(Notify::new());
        let consumer_loop = ConsumerLoop {
            queue,
            poll_timeout: config.poll_timeout,
            handler: MessageHandler {
                processor: EventsProcessor::new(notifications_service),
                metrics,
                topic: config.exchange,
                auto_ack: config.auto_ack,
            },
        };
        let handle = tokio::spawn(consumer_loop.run(Arc::clone(&close_notify)));

        Self {
            close_notify,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    ///
    /// Stops the loop and waits until the queue is closed.
    /// Calling it more than once does nothing.
    ///
    pub async fn close(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.close_notify.notify_one();
        match handle.await {
            Ok(()) => tracing::info!("consumer closed"),
            Err(err) => tracing::error!(%err, "consumer task failed"),
        }
    }
}

struct ConsumerLoop<Q> {
    queue: Q,
    poll_timeout: Duration,
    handler: MessageHandler,
}

impl<Q: EventsQueue> ConsumerLoop<Q> {
    #[tracing::instrument(name = "Notifications Consumer Loop", skip_all)]
    async fn run(mut self, close_notify: Arc<Notify>) {
        loop {
            let result = tokio::select! {
                biased;

                _ = close_notify.notified() => break,
                result = self.queue.poll(self.poll_timeout) => result,
            };

            match result {
                Ok(message) => self.handler.handle(message).await,
                Err(PollError::Timeout) => continue,
                Err(PollError::Closed) => {
                    tracing::warn!("queue closed");
                    break;
                }
            }
        }

        self.queue.close().await;
    }
}

struct MessageHandler {
    processor: EventsProcessor,
    metrics: Arc<dyn MetricsProvider>,
    topic: String,
    auto_ack: bool,
}

impl MessageHandler {
    #[tracing::instrument(
        name = "Notifications Consumer",
        skip_all,
        fields(
            delivery_tag = message.delivery_tag(),
        )
    )]
    async fn handle<M: QueueMessage>(&self, message: M) {
        tracing::info!("processing event");
        let started = Instant::now();

        let result = AssertUnwindSafe(self.processor.process(message.content()))
            .catch_unwind()
            .await;
        let success = match result {
            Ok(Ok(notification_id)) => {
                tracing::info!(notification_id, "event processed");
                true
            }
            Ok(Err(err)) if is_unhandled_event(&err) => {
                tracing::warn!(%err, "skipped event");
                false
            }
            Ok(Err(err @ Error::InvalidInput(_))) => {
                tracing::error!(%err, "rejected invalid event");
                false
            }
            Ok(Err(err)) => {
                tracing::error!(%err, "failed to process event");
                false
            }
            Err(panic) => {
                tracing::error!(panic = panic_message(panic.as_ref()), "event processing panicked");
                false
            }
        };

        self.metrics
            .increment_queue_messages(&self.topic, CONSUME_OPERATION, success);
        self.metrics.record_queue_message_duration(
            &self.topic,
            CONSUME_OPERATION,
            started.elapsed(),
        );

        if !self.auto_ack {
            match message.commit().await {
                Ok(()) => tracing::trace!("message committed"),
                Err(err) => tracing::warn!(%err, "failed to commit message"),
            }
        }
    }
}

///
/// Events of types this service doesn't consume are expected on a shared exchange
///
fn is_unhandled_event(err: &Error) -> bool {
    matches!(err, Error::InvalidInput(UNKNOWN_EVENT_TYPE))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
