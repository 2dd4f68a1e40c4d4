//! memecoin-pulse server entry point.
//!
//! Loads configuration, runs the first refresh, then serves the REST API
//! while the scheduler keeps refreshing in the background.

use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use memecoin_pulse::api;
use memecoin_pulse::app_state::AppState;
use memecoin_pulse::config::TrackerConfig;
use memecoin_pulse::persistence::SqliteStore;
use memecoin_pulse::sentiment::{LexiconPolarity, PostPool, SentimentScorer};
use memecoin_pulse::service::{
    CoinGeckoClient, QueryService, RefreshScheduler, RefreshService, SnapshotWriter,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = TrackerConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        coins = %config.tracked_coins.joined(),
        interval_secs = config.refresh_interval.as_secs(),
        "starting memecoin-pulse"
    );

    // Storage
    let store = SqliteStore::connect(&config.database_path, config.database_max_connections).await?;
    store.init_schema().await?;

    // Refresh pipeline
    let posts = PostPool::load(config.posts_file.as_deref())?;
    let posts_loaded = posts.len();
    let scorer = SentimentScorer::new(
        Arc::new(posts),
        Arc::new(LexiconPolarity::new()),
        config.sentiment_sample_size,
    );
    tracing::info!(
        posts = posts_loaded,
        sample_size = scorer.sample_size(),
        "sentiment scorer ready"
    );
    let provider = Arc::new(CoinGeckoClient::new(
        config.price_api_base_url.clone(),
        config.price_api_timeout,
    )?);
    let refresh_service = Arc::new(RefreshService::new(
        provider,
        scorer,
        SnapshotWriter::new(store.clone(), config.tracked_coins.clone()),
        config.tracked_coins.clone(),
        RefreshService::rng_from_seed(config.sentiment_seed),
    ));
    let query_service = Arc::new(QueryService::new(store.clone(), config.tracked_coins.clone()));

    // First refresh blocks startup; failure is logged, not fatal
    let cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::new(
        Arc::clone(&refresh_service),
        config.refresh_interval,
        cancel.clone(),
    );
    let (_, scheduler_handle) = scheduler.start().await;

    // Build application state
    let app_state = AppState {
        query_service,
        refresh_service,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    // Let an in-flight cycle finish before closing storage
    cancel.cancel();
    if let Err(e) = scheduler_handle.await {
        tracing::error!(error = %e, "refresh loop terminated abnormally");
    }
    store.close().await;
    tracing::info!("memecoin-pulse stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM and cancels the refresh loop.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
    cancel.cancel();
}
