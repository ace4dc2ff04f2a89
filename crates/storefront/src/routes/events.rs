//! DOM event endpoint.
//!
//! Every interactive element posts its `hx-vals` description here. The event
//! is resolved against the dispatch table, applied to the page session, and
//! answered with out-of-band fragments for whatever changed.

use axum::{Form, extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::controller::{DomEvent, PAGE_SESSION_KEY, PageId, resolve};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// The page this session is on. A session without one gets a fresh page.
async fn page_id(state: &AppState, session: &Session) -> Result<PageId> {
    if let Some(id) = session.get::<PageId>(PAGE_SESSION_KEY).await? {
        return Ok(id);
    }
    let id = state.pages().start().await;
    session.insert(PAGE_SESSION_KEY, id).await?;
    Ok(id)
}

/// Handle one DOM event.
///
/// The page stays locked until the action has been applied, so concurrent
/// events from one page run in arrival order.
#[instrument(skip(state, session, event), fields(event = ?event.event, target = %event.target))]
pub async fn dispatch(
    State(state): State<AppState>,
    session: Session,
    Form(event): Form<DomEvent>,
) -> Result<impl IntoResponse> {
    let Some(action) = resolve(&event) else {
        tracing::debug!("No binding for event");
        return Err(AppError::BadRequest(format!(
            "no binding for {:?} on {}",
            event.event, event.target
        )));
    };

    let id = page_id(&state, &session).await?;
    let mut page = state.pages().lock(id).await;
    let update = state.controller().handle(action, &mut page).await?;
    drop(page);

    Ok(update)
}
