//! Memecoin read handlers: root redirect, latest list, per-coin history.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CoinHistoryResponse, LatestSnapshotDto};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, TrackerError};

/// `GET /` — Redirect to the memecoin list.
#[utoipa::path(
    get,
    path = "/",
    tag = "Memecoins",
    summary = "Redirect to /memecoins",
    responses(
        (status = 302, description = "Redirect to /memecoins"),
    )
)]
pub async fn root_redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/memecoins")])
}

/// `GET /memecoins` — Latest snapshot per tracked coin.
///
/// # Errors
///
/// Returns [`TrackerError::Persistence`] if storage cannot be read.
#[utoipa::path(
    get,
    path = "/memecoins",
    tag = "Memecoins",
    summary = "List latest snapshots",
    description = "Returns the most recent snapshot of every tracked coin that has data. Coins without snapshots are omitted.",
    responses(
        (status = 200, description = "Latest snapshot per coin", body = Vec<LatestSnapshotDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_memecoins(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, TrackerError> {
    let latest: Vec<LatestSnapshotDto> = state
        .query_service
        .list_latest()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(latest))
}

/// `GET /memecoins/{coin}` — Latest snapshot and recent history.
///
/// # Errors
///
/// Returns [`TrackerError::NotFound`] if the coin is not tracked or has no
/// data yet.
#[utoipa::path(
    get,
    path = "/memecoins/{coin}",
    tag = "Memecoins",
    summary = "Get coin history",
    description = "Returns the latest snapshot and up to 10 most recent snapshots, newest first.",
    params(
        ("coin" = String, Path, description = "Coin identifier, e.g. `dogecoin`"),
    ),
    responses(
        (status = 200, description = "Coin history", body = CoinHistoryResponse),
        (status = 404, description = "Memecoin not tracked, or no data available", body = ErrorResponse),
    )
)]
pub async fn get_memecoin(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Result<impl IntoResponse, TrackerError> {
    let history = state.query_service.get_history(&coin).await?;
    Ok(Json(CoinHistoryResponse::from(history)))
}

/// Memecoin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_redirect))
        .route("/memecoins", get(list_memecoins))
        .route("/memecoins/{coin}", get(get_memecoin))
}
