//! HTTP API boundary
//!
//! Typed procedures grouped by domain (auth, stocks, indices, watchlist,
//! news, ipos, screeners, admin). Identity comes from the session cookie;
//! malformed requests are rejected by the extractors before reaching the
//! services.

pub mod handlers;
pub mod server;
pub mod session;
pub mod types;
