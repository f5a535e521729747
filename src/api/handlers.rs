//! API endpoint handlers, grouped by domain
//!
//! Handlers stay thin: resolve the caller where identity is required, then
//! dispatch to a service. Degraded dependencies surface as empty lists or
//! nulls here, never as errors.

use crate::api::session;
use crate::api::types::*;
use crate::db::models::{
    Ipo, MarketIndex, NewsArticle, Screener, Stock, User, UserUpsert, WatchlistEntry,
    WatchlistItem,
};
use crate::db::ScreenerCreate;
use crate::error::{AppError, Result};
use crate::fmp::types::{CompanyProfile, PricePoint, Quote};
use crate::services::{
    screener_filter, MarketService, RefreshService, RefreshSummary, ScreenerBounds,
    WatchlistService,
};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use axum::Json;
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Health Check
// ============================================================================

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "stockdash" }))
}

// ============================================================================
// Auth
// ============================================================================

/// GET /api/v1/auth/me - the calling user, or null when anonymous
pub async fn auth_me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Option<User>> {
    Json(session::current_user(&state, &headers))
}

/// POST /api/v1/auth/logout - drop the session and clear the cookie
pub async fn auth_logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session::session_token(&headers) {
        state.sessions.remove(&token);
    }
    (
        AppendHeaders([(SET_COOKIE, session::clear_session_cookie())]),
        Json(SuccessResponse::ok()),
    )
}

/// GET /auth/callback - terminus of the external OAuth portal redirect.
///
/// The portal has already verified the identity; this upserts the user,
/// issues the session cookie, and sends the browser back to the app.
/// Identity persistence failure is fatal to the login flow.
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(identity): Query<CallbackQuery>,
) -> Result<impl IntoResponse> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("database not configured".to_string()))?;

    let user = db.upsert_user(
        &UserUpsert {
            open_id: identity.open_id,
            name: identity.name,
            email: identity.email,
            login_method: identity.login_method,
            role: None,
        },
        state.config.owner_open_id.as_deref(),
    )?;

    info!("User {} signed in", user.id);
    let token = state.sessions.create(user.id, user.open_id);

    Ok((
        AppendHeaders([(SET_COOKIE, session::session_cookie(&token))]),
        Redirect::to("/"),
    ))
}

// ============================================================================
// Stocks
// ============================================================================

/// GET /api/v1/stocks/gainers
pub async fn stocks_top_gainers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<Stock>> {
    let limit = params.limit.unwrap_or(DEFAULT_MOVERS_LIMIT);
    Json(MarketService::top_gainers(&state, limit))
}

/// GET /api/v1/stocks/losers
pub async fn stocks_top_losers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<Stock>> {
    let limit = params.limit.unwrap_or(DEFAULT_MOVERS_LIMIT);
    Json(MarketService::top_losers(&state, limit))
}

/// GET /api/v1/stocks/search
pub async fn stocks_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Stock>> {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Json(MarketService::search(&state, &params.query, limit))
}

/// GET /api/v1/stocks/:symbol
pub async fn stocks_get(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<Option<Stock>> {
    Json(MarketService::get_stock(&state, &symbol))
}

/// GET /api/v1/stocks/search/live - live provider search with full quotes
pub async fn stocks_search_live(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Quote>> {
    Json(state.quotes.search(&params.query).await)
}

/// GET /api/v1/stocks/:symbol/quote - live quote pass-through
pub async fn stocks_live_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<Option<Quote>> {
    Json(state.quotes.get_quote(&symbol).await)
}

/// GET /api/v1/stocks/:symbol/profile - live pass-through to the provider
pub async fn stocks_profile(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<Option<CompanyProfile>> {
    Json(state.quotes.get_company_profile(&symbol).await)
}

/// GET /api/v1/stocks/:symbol/history - live pass-through to the provider
pub async fn stocks_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<PricePoint>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(state.quotes.get_historical_prices(&symbol, limit).await)
}

/// POST /api/v1/stocks/screener - filter the movers union by ad-hoc bounds
pub async fn stocks_screener(
    State(state): State<Arc<AppState>>,
    Json(bounds): Json<ScreenerBounds>,
) -> Json<Vec<Stock>> {
    let candidates = MarketService::screener_candidates(&state);
    Json(screener_filter(candidates, &bounds))
}

// ============================================================================
// Indices
// ============================================================================

/// GET /api/v1/indices
pub async fn indices_all(State(state): State<Arc<AppState>>) -> Json<Vec<MarketIndex>> {
    Json(MarketService::indices(&state))
}

/// GET /api/v1/indices/:symbol
pub async fn indices_get(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Json<Option<MarketIndex>> {
    Json(MarketService::get_index(&state, &symbol))
}

// ============================================================================
// Watchlist (identity required)
// ============================================================================

/// GET /api/v1/watchlist
pub async fn watchlist_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<WatchlistItem>>> {
    let user = session::require_user(&state, &headers)?;
    Ok(Json(WatchlistService::list(&state, user.id)))
}

/// POST /api/v1/watchlist/add
pub async fn watchlist_add(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<WatchlistRequest>,
) -> Result<Json<Option<WatchlistEntry>>> {
    let user = session::require_user(&state, &headers)?;
    let entry = WatchlistService::add(&state, user.id, request.stock_id)?;
    Ok(Json(entry))
}

/// POST /api/v1/watchlist/remove
pub async fn watchlist_remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<WatchlistRequest>,
) -> Result<Json<SuccessResponse>> {
    let user = session::require_user(&state, &headers)?;
    WatchlistService::remove(&state, user.id, request.stock_id)?;
    Ok(Json(SuccessResponse::ok()))
}

// ============================================================================
// News
// ============================================================================

/// GET /api/v1/news
pub async fn news_latest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<NewsArticle>> {
    let limit = params.limit.unwrap_or(DEFAULT_NEWS_LIMIT);
    Json(MarketService::latest_news(&state, limit))
}

// ============================================================================
// IPOs
// ============================================================================

/// GET /api/v1/ipos/upcoming
pub async fn ipos_upcoming(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<Ipo>> {
    let limit = params.limit.unwrap_or(DEFAULT_IPO_LIMIT);
    Json(MarketService::upcoming_ipos(&state, limit))
}

/// GET /api/v1/ipos/recent
pub async fn ipos_recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<Ipo>> {
    let limit = params.limit.unwrap_or(DEFAULT_IPO_LIMIT);
    Json(MarketService::recent_ipos(&state, limit))
}

// ============================================================================
// Saved Screeners (identity required)
// ============================================================================

/// GET /api/v1/screeners
pub async fn screeners_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Screener>>> {
    let user = session::require_user(&state, &headers)?;
    let Some(db) = &state.db else {
        return Ok(Json(vec![]));
    };
    Ok(Json(db.screeners_for_user(user.id)?))
}

/// POST /api/v1/screeners
pub async fn screeners_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateScreenerRequest>,
) -> Result<Json<Screener>> {
    let user = session::require_user(&state, &headers)?;
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("database not configured".to_string()))?;

    let screener = db.create_screener(
        user.id,
        &ScreenerCreate {
            name: request.name,
            description: request.description,
            filters: request.filters.to_string(),
            is_public: request.is_public,
        },
    )?;
    Ok(Json(screener))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /api/v1/admin/refresh - pull fresh market data into the store
pub async fn admin_refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshSummary>> {
    let user = session::require_admin(&state, &headers)?;
    info!("Market data refresh triggered by user {}", user.id);
    Ok(Json(RefreshService::refresh_market_data(&state).await))
}
