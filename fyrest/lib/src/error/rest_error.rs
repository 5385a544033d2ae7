//! Top-level error type.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use super::{ConfigError, PrincipalError, RouteError};
use crate::response::ApiResponse;

/// Top-level error type for all fyrest operations.
///
/// ## Examples
///
/// ```rust
/// use fyrest_lib::{PrincipalError, RestError};
///
/// fn describe(err: &RestError) -> &'static str {
///     match err {
///         RestError::Route(_) => "bad route declaration",
///         RestError::Principal(_) => "principal lookup failed",
///         RestError::Config(_) => "bad configuration",
///     }
/// }
///
/// let err: RestError = PrincipalError::unavailable("down").into();
/// assert_eq!(describe(&err), "principal lookup failed");
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// Route declaration errors.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Principal lookup errors.
    #[error(transparent)]
    Principal(#[from] PrincipalError),

    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = ApiResponse::failure("Internal Server Error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
