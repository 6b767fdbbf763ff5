//! `ServiceError` → HTTP response mapping.
//!
//! This is the only place that knows status codes for service failures.
//! Bodies are always `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::json;
use std::any::Any;
use std::time::Duration;

use crate::error::ServiceError;
use crate::resilience::TimeoutError;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::UnsupportedChain(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ServiceError::CircuitOpen(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Network(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Adapter(_) | ServiceError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), kind = self.kind(), error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

/// Convert a handler panic into a 500 without leaking the payload.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Map errors from the tower middleware stack. An elapsed request deadline
/// is a 408 like any other timeout.
pub fn handle_layer_error(err: BoxError, deadline: Duration) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        ServiceError::Timeout(TimeoutError { after: deadline }).into_response()
    } else {
        ServiceError::Adapter(format!("Unhandled middleware error: {}", err)).into_response()
    }
}

/// Body for unmatched routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
