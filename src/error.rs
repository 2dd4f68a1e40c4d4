//! Tracker error types with HTTP status code mapping.
//!
//! [`TrackerError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "Memecoin not tracked"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Why a query came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The coin is not part of the configured tracked set.
    CoinNotTracked,
    /// The coin is tracked but has no stored snapshots yet.
    NoData,
}

impl NotFoundReason {
    /// Short machine-facing reason string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CoinNotTracked => "coin not tracked",
            Self::NoData => "no data available",
        }
    }

    /// Client-facing message used in HTTP responses.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::CoinNotTracked => "Memecoin not tracked",
            Self::NoData => "No data available",
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Config     | 500 (startup only)        |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
/// | 5000–5999 | Upstream   | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Price provider unreachable, timed out, or returned an incomplete
    /// quote set.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Storage unavailable or a write was rejected.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Query for an untracked coin or a coin without history.
    #[error("not found: {0}")]
    NotFound(NotFoundReason),

    /// Missing or invalid configuration at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Config(_) => 1001,
            Self::NotFound(NotFoundReason::CoinNotTracked) => 2001,
            Self::NotFound(NotFoundReason::NoData) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Upstream(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::NotFound(reason) => reason.client_message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for TrackerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Upstream(format!("request timed out: {err}"))
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.client_message(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
