//! Watchlist management
//!
//! All operations are scoped to the authenticated caller; there is no
//! cross-user listing or removal path. Add/remove are idempotent. A missing
//! store turns writes into logged no-ops, but a referential violation (add
//! for a nonexistent stock) propagates to the caller.

use crate::db::models::{WatchlistEntry, WatchlistItem};
use crate::error::Result;
use crate::state::AppState;
use tracing::{debug, error, warn};

/// Watchlist service enforcing per-user ownership
pub struct WatchlistService;

impl WatchlistService {
    /// The caller's watchlist with joined stock rows, oldest first
    pub fn list(state: &AppState, user_id: i64) -> Vec<WatchlistItem> {
        let Some(db) = &state.db else {
            debug!("Store not configured; returning empty watchlist");
            return vec![];
        };
        match db.watchlist_for_user(user_id) {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to read watchlist for user {}: {}", user_id, e);
                vec![]
            }
        }
    }

    /// Add a stock to the caller's watchlist.
    ///
    /// Returns the entry (existing on a duplicate add), `None` when no store
    /// is configured, or `NotFound` when the stock does not exist.
    pub fn add(state: &AppState, user_id: i64, stock_id: i64) -> Result<Option<WatchlistEntry>> {
        let Some(db) = &state.db else {
            warn!("Store not configured; watchlist add is a no-op");
            return Ok(None);
        };
        db.watchlist_add(user_id, stock_id).map(Some)
    }

    /// Remove a stock from the caller's watchlist; absent pairs are a no-op
    pub fn remove(state: &AppState, user_id: i64, stock_id: i64) -> Result<()> {
        let Some(db) = &state.db else {
            warn!("Store not configured; watchlist remove is a no-op");
            return Ok(());
        };
        db.watchlist_remove(user_id, stock_id)
    }
}
