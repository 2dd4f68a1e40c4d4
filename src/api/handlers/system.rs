//! System endpoints: health check and manual refresh.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::RefreshResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, TrackerError};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    tracked_coins: Vec<String>,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, tracked coins, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tracked_coins: state
                .query_service
                .coins()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }),
    )
}

/// `POST /admin/refresh` — Run a refresh cycle now.
///
/// Waits for any scheduled cycle already in flight, then runs its own.
///
/// # Errors
///
/// Returns [`TrackerError::Upstream`] if prices cannot be fetched or
/// [`TrackerError::Persistence`] if a row cannot be written.
#[utoipa::path(
    post,
    path = "/admin/refresh",
    tag = "System",
    summary = "Trigger a refresh",
    description = "Runs one fetch → score → write cycle, serialized with the background scheduler.",
    responses(
        (status = 200, description = "Data updated", body = RefreshResponse),
        (status = 502, description = "Price provider failure", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, TrackerError> {
    let report = state.refresh_service.refresh().await?;
    tracing::info!(written = report.snapshots.len(), "manual refresh complete");
    Ok(Json(RefreshResponse {
        message: "Data updated".to_string(),
        written: report.snapshots.len(),
        elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
    }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/admin/refresh", post(refresh_handler))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::service::QueryService;
    use crate::service::refresh_service::tests::{StubProvider, service_with};

    async fn app(fail_first: usize) -> Router {
        let provider = Arc::new(StubProvider::new(
            &[("bitcoin", 1.0), ("dogecoin", 0.1)],
            fail_first,
        ));
        let (refresh, store) = service_with(provider, &["bitcoin", "dogecoin"], 0.5).await;
        routes().with_state(AppState {
            query_service: Arc::new(QueryService::new(store, refresh.coins().clone())),
            refresh_service: refresh,
        })
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let Ok(req) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
            panic!("bad request");
        };
        let Ok(resp) = app.oneshot(req).await else {
            panic!("request failed");
        };
        let status = resp.status();
        let Ok(bytes) = to_bytes(resp.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        (
            status,
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        )
    }

    #[tokio::test]
    async fn health_lists_tracked_coins() {
        let (status, body) = send(app(0).await, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pointer("/status"), Some(&serde_json::json!("healthy")));
        assert_eq!(
            body.pointer("/tracked_coins"),
            Some(&serde_json::json!(["bitcoin", "dogecoin"]))
        );
    }

    #[tokio::test]
    async fn manual_refresh_writes_rows() {
        let (status, body) = send(app(0).await, "POST", "/admin/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pointer("/message"), Some(&serde_json::json!("Data updated")));
        assert_eq!(body.pointer("/written"), Some(&serde_json::json!(2)));
    }

    #[tokio::test]
    async fn manual_refresh_surfaces_upstream_failure() {
        let (status, body) = send(app(1).await, "POST", "/admin/refresh").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.pointer("/error/code"), Some(&serde_json::json!(5001)));
    }
}
