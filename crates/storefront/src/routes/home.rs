//! Home page route handler.

use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::controller::{PAGE_SESSION_KEY, PageId, PageSession};
use crate::error::Result;
use crate::state::AppState;

/// Display the storefront page.
///
/// A full page load starts a fresh page session: the cart and every open
/// surface are reset, and the grid shows the whole catalog.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    if let Some(previous) = session.get::<PageId>(PAGE_SESSION_KEY).await? {
        state.pages().discard(previous).await;
    }
    let id = state.pages().start().await;
    session.insert(PAGE_SESSION_KEY, id).await?;

    Ok(state.controller().initial_page(&PageSession::default()).await?)
}
