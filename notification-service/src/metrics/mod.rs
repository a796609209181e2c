mod metrics_provider;
mod metrics_router;
mod prometheus_metrics;

pub use metrics_provider::*;
pub use metrics_router::*;
pub use prometheus_metrics::*;

///
/// Metrics mock that accepts any call.
///
#[cfg(test)]
pub fn mock_metrics_provider() -> MockMetricsProvider {
    let mut metrics = MockMetricsProvider::new();
    metrics.expect_increment_grpc_requests().return_const(());
    metrics.expect_record_grpc_request_duration().return_const(());
    metrics.expect_increment_database_queries().return_const(());
    metrics.expect_record_database_query_duration().return_const(());
    metrics.expect_increment_notification_operations().return_const(());
    metrics.expect_increment_queue_messages().return_const(());
    metrics.expect_record_queue_message_duration().return_const(());
    metrics.expect_set_health().return_const(());

    metrics
}
