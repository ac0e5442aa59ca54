mod config;
mod models;
mod routes;
mod services;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::cache::SearchCache;
use crate::services::storytel::{StorytelClient, StorytelProvider};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub cache: SearchCache,
    pub provider: StorytelProvider<StorytelClient>,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storytel_provider=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting Storytel Provider v{}", env!("CARGO_PKG_VERSION"));

    // Initialize services
    let cache = SearchCache::new(config.search_cache_ttl_ms);
    tracing::info!(
        "Search cache initialized (ttl: {}ms)",
        config.search_cache_ttl_ms
    );

    let client = StorytelClient::new(&config.user_agent, config.fetch_timeout_ms);
    let provider = StorytelProvider::new(client, cache.clone(), &config.locale);
    tracing::info!("Storytel provider initialized (locale: {})", config.locale);

    // Build application state
    let state = Arc::new(AppState {
        config,
        cache,
        provider,
        start_time: Instant::now(),
    });

    // Build router
    let app = Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Metadata endpoint
        .route("/search", get(routes::search::search_books))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
