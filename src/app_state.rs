//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{QueryService, RefreshService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built once in `main`; the same [`RefreshService`] is also owned by the
/// background scheduler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-only snapshot queries.
    pub query_service: Arc<QueryService>,
    /// Refresh pipeline, for manual triggers.
    pub refresh_service: Arc<RefreshService>,
}
