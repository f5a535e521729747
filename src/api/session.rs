//! Session cookie plumbing
//!
//! The OAuth flow itself lives in an external portal; this module only
//! turns its verified callback into a cookie-backed session and resolves
//! that cookie back to a user on later requests.

use crate::db::models::{Role, User};
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;

pub const SESSION_COOKIE: &str = "stockdash_session";

/// Extract the session token from the request's Cookie headers
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, token) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| token.to_string())
        })
        .next()
}

/// Cookie value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    )
}

/// Cookie value clearing the session
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Resolve the calling user, if any; a missing or failing store resolves to
/// anonymous rather than an error
pub fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = session_token(headers)?;
    let session = state.sessions.get(&token)?;

    let db = state.db.as_ref()?;
    match db.get_user_by_id(session.user_id) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to resolve session user {}: {}", session.user_id, e);
            None
        }
    }
}

/// Resolve the calling user or fail with an authentication error
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    current_user(state, headers).ok_or_else(|| AppError::Auth("not authenticated".to_string()))
}

/// Resolve the calling user and require the admin role
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let user = require_user(state, headers)?;
    if user.role != Role::Admin {
        return Err(AppError::Auth("admin role required".to_string()));
    }
    Ok(user)
}
