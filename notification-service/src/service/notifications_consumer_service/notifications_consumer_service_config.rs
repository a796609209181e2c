use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NotificationsConsumerServiceConfig {
    /// Topic exchange events are published to
    pub exchange: String,
    /// Queue shared by all instances of the service
    pub queue: String,
    pub binding_key: String,

    /// When set, broker forgets a message as soon as it's delivered
    pub auto_ack: bool,
    pub prefetch_count: u16,
    pub poll_timeout: Duration,
}
