//! Access Log Middleware
//!
//! Emits one structured line per HTTP transaction: method, URI, status,
//! latency and response body size.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(axum::middleware::from_fn(platform::access_log::access_log));
//! ```

use axum::body::HttpBody;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

/// Middleware that logs every request after the inner service has answered
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let bytes = response.body().size_hint().exact();
    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        bytes = bytes,
        "access"
    );

    response
}
