use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RabbitmqConnectionConfig {
    /// Delay between consecutive attempts to restore connection, channel or consumer
    pub retry_interval: Duration,
}
