//! Error conversions - rendering [`AppError`] at the HTTP boundary
//!
//! With the `axum` feature, [`AppError`] implements `IntoResponse` and is
//! rendered as an RFC 7807 Problem Details document.

#[cfg(feature = "axum")]
use super::app_error::AppError;

/// Media type of RFC 7807 problem documents
pub const PROBLEM_MEDIA_TYPE: &str = "application/problem+json";

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });
        if let Some(action) = self.action() {
            body["action"] = serde_json::Value::from(action);
        }

        match serde_json::to_vec(&body) {
            Ok(bytes) => {
                (status, [(header::CONTENT_TYPE, PROBLEM_MEDIA_TYPE)], bytes).into_response()
            }
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                "JSON encoding failed",
            )
                .into_response(),
        }
    }
}
