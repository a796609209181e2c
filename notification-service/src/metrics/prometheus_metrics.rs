use super::{metrics_provider::status_label, MetricsProvider};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};
use std::time::Duration;

const NAMESPACE: &str = "notification_service";

///
/// [MetricsProvider] backed by collectors registered in a caller owned [Registry].
///
pub struct PrometheusMetrics {
    grpc_requests: IntCounterVec,
    grpc_request_duration: HistogramVec,
    database_queries: IntCounterVec,
    database_query_duration: HistogramVec,
    notification_operations: IntCounterVec,
    queue_messages: IntCounterVec,
    queue_message_duration: HistogramVec,
    health: IntGauge,
}

impl PrometheusMetrics {
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        let grpc_requests = IntCounterVec::new(
            Opts::new("grpc_requests_total", "Total number of gRPC requests").namespace(NAMESPACE),
            &["method", "status"],
        )?;
        let grpc_request_duration = HistogramVec::new(
            HistogramOpts::new("grpc_request_duration_seconds", "Duration of gRPC requests")
                .namespace(NAMESPACE),
            &["method", "status"],
        )?;
        let database_queries = IntCounterVec::new(
            Opts::new("database_queries_total", "Total number of database queries")
                .namespace(NAMESPACE),
            &["query_type", "status"],
        )?;
        let database_query_duration = HistogramVec::new(
            HistogramOpts::new("database_query_duration_seconds", "Duration of database queries")
                .namespace(NAMESPACE),
            &["query_type"],
        )?;
        let notification_operations = IntCounterVec::new(
            Opts::new(
                "notification_operations_total",
                "Total number of notification operations",
            )
            .namespace(NAMESPACE),
            &["operation", "status"],
        )?;
        let queue_messages = IntCounterVec::new(
            Opts::new("queue_messages_total", "Total number of queue messages")
                .namespace(NAMESPACE),
            &["topic", "operation", "status"],
        )?;
        let queue_message_duration = HistogramVec::new(
            HistogramOpts::new(
                "queue_message_duration_seconds",
                "Duration of queue message operations",
            )
            .namespace(NAMESPACE),
            &["topic", "operation"],
        )?;
        let health = IntGauge::with_opts(
            Opts::new("health", "Service health status (1 = healthy, 0 = unhealthy)")
                .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(grpc_requests.clone()))?;
        registry.register(Box::new(grpc_request_duration.clone()))?;
        registry.register(Box::new(database_queries.clone()))?;
        registry.register(Box::new(database_query_duration.clone()))?;
        registry.register(Box::new(notification_operations.clone()))?;
        registry.register(Box::new(queue_messages.clone()))?;
        registry.register(Box::new(queue_message_duration.clone()))?;
        registry.register(Box::new(health.clone()))?;

        Ok(Self {
            grpc_requests,
            grpc_request_duration,
            database_queries,
            database_query_duration,
            notification_operations,
            queue_messages,
            queue_message_duration,
            health,
        })
    }
}

impl MetricsProvider for PrometheusMetrics {
    fn increment_grpc_requests(&self, method: &str, code: &str) {
        self.grpc_requests.with_label_values(&[method, code]).inc();
    }

    fn record_grpc_request_duration(&self, method: &str, code: &str, duration: Duration) {
        self.grpc_request_duration
            .with_label_values(&[method, code])
            .observe(duration.as_secs_f64());
    }

    fn increment_database_queries(&self, query_type: &str, success: bool) {
        self.database_queries
            .with_label_values(&[query_type, status_label(success)])
            .inc();
    }

    fn record_database_query_duration(&self, query_type: &str, duration: Duration) {
        self.database_query_duration
            .with_label_values(&[query_type])
            .observe(duration.as_secs_f64());
    }

    fn increment_notification_operations(&self, operation: &str, success: bool) {
        self.notification_operations
            .with_label_values(&[operation, status_label(success)])
            .inc();
    }

    fn increment_queue_messages(&self, topic: &str, operation: &str, success: bool) {
        self.queue_messages
            .with_label_values(&[topic, operation, status_label(success)])
            .inc();
    }

    fn record_queue_message_duration(&self, topic: &str, operation: &str, duration: Duration) {
        self.queue_message_duration
            .with_label_values(&[topic, operation])
            .observe(duration.as_secs_f64());
    }

    fn set_health(&self, healthy: bool) {
        self.health.set(i64::from(healthy));
    }
}
