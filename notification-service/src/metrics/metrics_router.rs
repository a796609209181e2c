use axum::{extract::State, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, Registry, TextEncoder};

///
/// Router exposing `GET /metrics` in Prometheus text format.
///
pub fn create_metrics_router(registry: Registry) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(registry)
}

async fn metrics(State(registry): State<Registry>) -> Result<String, StatusCode> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .map_err(|err| {
            tracing::error!(%err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    String::from_utf8(buffer).map_err(|err| {
        tracing::error!(%err, "metrics are not valid utf-8");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metrics::{MetricsProvider, PrometheusMetrics};
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn metrics_endpoint_renders_registered_collectors() {
        let registry = Registry::new();
        let metrics = PrometheusMetrics::new(&registry).unwrap();
        metrics.increment_notification_operations("save_notification", true);

        let response = create_metrics_router(registry)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(
            r#"notification_service_notification_operations_total{operation="save_notification",status="success"} 1"#
        ));
    }
}
