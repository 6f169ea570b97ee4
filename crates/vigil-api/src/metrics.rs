//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vigil_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vigil_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vigil_http_requests_in_flight";

    // Detection metrics
    pub const FRAMES_PROCESSED_TOTAL: &str = "vigil_frames_processed_total";
    pub const ALERTS_TOTAL: &str = "vigil_alerts_total";
    pub const BACKEND_DURATION_SECONDS: &str = "vigil_backend_duration_seconds";
    pub const BACKEND_FAILURES_TOTAL: &str = "vigil_backend_failures_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vigil_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a processed frame and whether it raised an alert.
pub fn record_frame_processed(detected: bool) {
    let labels = [("detected", detected.to_string())];
    counter!(names::FRAMES_PROCESSED_TOTAL, &labels).increment(1);
}

/// Record an alert by winning object type.
pub fn record_alert(object_type: &str) {
    let labels = [("object_type", object_type.to_string())];
    counter!(names::ALERTS_TOTAL, &labels).increment(1);
}

/// Record per-backend inference duration.
pub fn record_backend_duration(backend: &str, duration_secs: f64) {
    let labels = [("backend", backend.to_string())];
    histogram!(names::BACKEND_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a backend failure.
pub fn record_backend_failure(backend: &str) {
    let labels = [("backend", backend.to_string())];
    counter!(names::BACKEND_FAILURES_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
///
/// Routes here are static (no path parameters), so the raw path is a safe
/// metrics label.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
