//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (starts a fresh page session)
//! POST /ui/events              - DOM event dispatch (HTMX, out-of-band fragments)
//! GET  /health                 - Health check
//! GET  /static/*               - Stylesheet, toast helper
//! *                            - 404 for anything else
//! ```

pub mod events;
pub mod home;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
pub async fn health() -> &'static str {
    "ok"
}

/// Fallback for paths no route matches.
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "No route");
    AppError::NotFound(uri.path().to_string())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/ui/events", post(events::dispatch))
        .route("/health", get(health))
        .fallback(not_found)
}
