//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "memecoin-pulse", description = "Memecoin price and sentiment snapshots"),
    paths(
        handlers::memecoins::root_redirect,
        handlers::memecoins::list_memecoins,
        handlers::memecoins::get_memecoin,
        handlers::system::health_handler,
        handlers::system::refresh_handler,
    ),
    components(schemas(
        dto::LatestSnapshotDto,
        dto::SnapshotEntryDto,
        dto::CoinHistoryResponse,
        dto::RefreshResponse,
        handlers::system::HealthResponse,
        crate::domain::SentimentLabel,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Memecoins", description = "Latest and historical snapshots"),
        (name = "System", description = "Health and administration"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::memecoins::routes())
        .merge(handlers::system::routes())
}
