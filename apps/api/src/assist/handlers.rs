use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::assist::draft::{draft_resume, open_chat};
use crate::assist::models::{ChatParams, ResumeDraft};
use crate::auth::SessionUser;
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// POST /api/v1/chat
/// Relays completion text to the client as it arrives. Disconnecting drops
/// the body stream, which cancels the upstream request.
pub async fn handle_chat(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(params): JsonBody<ChatParams>,
) -> Result<Response, AppError> {
    let cancel = CancellationToken::new();
    let rx = open_chat(state.completions.as_ref(), &params, cancel.clone()).await?;

    let guard = cancel.drop_guard();
    let body = ReceiverStream::new(rx).map(move |fragment| {
        // Held until the body stream is dropped.
        let _guard = &guard;
        fragment
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}

/// POST /api/v1/chat/draft
pub async fn handle_draft(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(params): JsonBody<ChatParams>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = draft_resume(state.completions.as_ref(), &params).await?;
    Ok(Json(draft))
}
