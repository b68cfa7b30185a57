//! Attachment upload and download.

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use ticket_core::{MediaRef, TicketError};
use ticket_store::{AttachmentStore, StoreError};
use tracing::info;

use crate::auth::CurrentActor;
use crate::error::{PortalError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: Option<String>,
}

/// Store a raw request body as an attachment.
pub async fn upload(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<MediaRef>)> {
    let bytes = to_bytes(body, state.max_upload_bytes).await.map_err(|_| {
        TicketError::Invalid(format!(
            "attachment exceeds {} bytes or was interrupted",
            state.max_upload_bytes
        ))
    })?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let filename = params
        .filename
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "upload".to_string());

    let media = state
        .engine
        .attachments()
        .put(&filename, content_type, bytes.to_vec())
        .await?;

    info!(
        id = %media.id,
        uploaded_by = %actor.email(),
        size = media.size,
        "Attachment uploaded"
    );

    Ok((StatusCode::CREATED, Json(media)))
}

/// Stream an attachment back with its stored content type.
pub async fn download(
    State(state): State<AppState>,
    CurrentActor(_actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Response> {
    let attachment = match state.engine.attachments().get(&id).await {
        Ok(attachment) => attachment,
        Err(StoreError::NotFound { .. }) => return Err(PortalError::AttachmentNotFound(id)),
        Err(e) => return Err(e.into()),
    };
    let disposition = format!(
        "inline; filename=\"{}\"",
        attachment.media.filename.replace('"', "")
    );

    Ok((
        [
            (CONTENT_TYPE, attachment.media.content_type),
            (CONTENT_DISPOSITION, disposition),
        ],
        attachment.bytes,
    )
        .into_response())
}
