//! The JSON response envelope.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client_type;

/// JSON envelope used for auth failures and available to handlers.
///
/// Absent fields are omitted from the serialized body, so a failure is
/// `{"success":false,"message":"Unauthorized"}`.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::ApiResponse;
///
/// let body = serde_json::to_value(ApiResponse::failure("Forbidden")).unwrap();
/// assert_eq!(body, serde_json::json!({"success": false, "message": "Forbidden"}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server-side handling time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

client_type!(ApiResponse {
    success: bool,
    data: Option<serde_json::Value>,
    message: Option<String>,
    time: Option<f64>,
});

impl ApiResponse {
    /// A successful response carrying `data`.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            time: None,
        }
    }

    /// A failed response with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            time: None,
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the handling time, usually [`RequestContext::elapsed`](crate::RequestContext::elapsed).
    pub fn with_time(mut self, seconds: f64) -> Self {
        self.time = Some(seconds);
        self
    }

    /// Pairs the envelope with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
