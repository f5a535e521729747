//! HTTP server assembly
//!
//! Builds the domain-grouped router and runs it with CORS, request tracing,
//! and graceful shutdown.

use crate::api::handlers;
use crate::state::AppState;
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // Allow-all CORS: the API serves a browser frontend from another origin
    // in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // OAuth portal callback (outside /api/v1: the portal redirects here)
        .route("/auth/callback", get(handlers::auth_callback))
        // Auth
        .route("/api/v1/auth/me", get(handlers::auth_me))
        .route("/api/v1/auth/logout", post(handlers::auth_logout))
        // Stocks
        .route("/api/v1/stocks/gainers", get(handlers::stocks_top_gainers))
        .route("/api/v1/stocks/losers", get(handlers::stocks_top_losers))
        .route("/api/v1/stocks/search", get(handlers::stocks_search))
        .route("/api/v1/stocks/search/live", get(handlers::stocks_search_live))
        .route("/api/v1/stocks/screener", post(handlers::stocks_screener))
        .route("/api/v1/stocks/:symbol", get(handlers::stocks_get))
        .route("/api/v1/stocks/:symbol/quote", get(handlers::stocks_live_quote))
        .route("/api/v1/stocks/:symbol/profile", get(handlers::stocks_profile))
        .route("/api/v1/stocks/:symbol/history", get(handlers::stocks_history))
        // Indices
        .route("/api/v1/indices", get(handlers::indices_all))
        .route("/api/v1/indices/:symbol", get(handlers::indices_get))
        // Watchlist
        .route("/api/v1/watchlist", get(handlers::watchlist_list))
        .route("/api/v1/watchlist/add", post(handlers::watchlist_add))
        .route("/api/v1/watchlist/remove", post(handlers::watchlist_remove))
        // News
        .route("/api/v1/news", get(handlers::news_latest))
        // IPOs
        .route("/api/v1/ipos/upcoming", get(handlers::ipos_upcoming))
        .route("/api/v1/ipos/recent", get(handlers::ipos_recent))
        // Saved screeners
        .route(
            "/api/v1/screeners",
            get(handlers::screeners_list).post(handlers::screeners_create),
        )
        // Admin
        .route("/api/v1/admin/refresh", post(handlers::admin_refresh))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port)
        .parse()
        .context("invalid HOST/PORT configuration")?;

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("StockDash API listening on http://{}", addr);
    info!("  GET  /health");
    info!("  GET  /api/v1/auth/me");
    info!("  GET  /api/v1/stocks/gainers");
    info!("  GET  /api/v1/stocks/losers");
    info!("  GET  /api/v1/stocks/search?query=...");
    info!("  GET  /api/v1/indices");
    info!("  GET  /api/v1/watchlist");
    info!("  GET  /api/v1/news");
    info!("  GET  /api/v1/ipos/upcoming");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("API server shutting down");
}
