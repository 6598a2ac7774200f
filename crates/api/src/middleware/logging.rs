use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// Request logging middleware
///
/// Logs method, path, status, and latency for every request after the
/// handler has run.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );

    response
}
