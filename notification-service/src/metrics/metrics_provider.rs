use std::time::Duration;

///
/// Sink for every metric emitted by the service.
///
/// `success` flags are exported as `status="success"|"error"` labels.
///
#[cfg_attr(test, mockall::automock)]
pub trait MetricsProvider: Send + Sync {
    fn increment_grpc_requests(&self, method: &str, code: &str);
    fn record_grpc_request_duration(&self, method: &str, code: &str, duration: Duration);

    fn increment_database_queries(&self, query_type: &str, success: bool);
    fn record_database_query_duration(&self, query_type: &str, duration: Duration);

    fn increment_notification_operations(&self, operation: &str, success: bool);

    fn increment_queue_messages(&self, topic: &str, operation: &str, success: bool);
    fn record_queue_message_duration(&self, topic: &str, operation: &str, duration: Duration);

    fn set_health(&self, healthy: bool);
}

pub(super) fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
