//! Ticket routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lifecycle::TicketView;
use ticket_core::{NewTicket, TicketAction, TicketId};

use crate::auth::CurrentActor;
use crate::error::Result;
use crate::state::AppState;

/// Tickets visible to the caller, oldest first.
pub async fn list(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<TicketView>>> {
    Ok(Json(state.engine.views(&actor).await?))
}

/// Submit a new ticket.
pub async fn submit(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(new_ticket): Json<NewTicket>,
) -> Result<(StatusCode, Json<TicketView>)> {
    let ticket = state.engine.submit(&actor, new_ticket).await?;
    Ok((StatusCode::CREATED, Json(TicketView::new(&actor, ticket))))
}

/// One ticket, if visible to the caller.
pub async fn show(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<TicketView>> {
    Ok(Json(state.engine.view(&actor, &TicketId::from(id)).await?))
}

/// Apply a lifecycle action.
pub async fn apply(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(action): Json<TicketAction>,
) -> Result<Json<TicketView>> {
    let ticket = state
        .engine
        .apply(&actor, &TicketId::from(id), action)
        .await?;
    Ok(Json(TicketView::new(&actor, ticket)))
}
