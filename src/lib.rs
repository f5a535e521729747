//! StockDash - Stock Market Dashboard Backend
//!
//! An HTTP API that proxies an upstream market-data provider and a
//! relational store for user accounts and watchlists. The browser frontend
//! renders market indices, top gainers/losers, news, and IPO listings
//! against the procedures exposed here.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod fmp;
pub mod services;
pub mod state;

use config::AppConfig;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the API server
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockdash=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StockDash...");

    let config = AppConfig::from_env();
    let state = Arc::new(AppState::from_config(config));

    api::server::serve(state).await
}
