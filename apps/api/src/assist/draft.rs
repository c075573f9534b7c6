//! Chat completion procedures: relay the raw stream, or consume it and
//! decode a validated `ResumeDraft` once the stream has completed.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::assist::models::{ChatParams, ResumeDraft};
use crate::assist::prompts::build_system_prompt;
use crate::errors::AppError;
use crate::forms::Form;
use crate::llm_client::{
    strip_json_fences, ChatRole, ChunkReceiver, CompletionRequest, CompletionService, LlmError,
};

pub fn completion_request(params: &ChatParams) -> CompletionRequest {
    CompletionRequest {
        system: build_system_prompt(params),
        messages: params
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .cloned()
            .collect(),
    }
}

/// Validates the params and opens the completion stream.
pub async fn open_chat(
    completions: &dyn CompletionService,
    params: &ChatParams,
    cancel: CancellationToken,
) -> Result<ChunkReceiver, AppError> {
    params.check()?;
    info!(
        "Opening chat completion ({} turns, profession={})",
        params.messages.len(),
        params.profession
    );
    Ok(completions.stream(completion_request(params), cancel).await?)
}

/// Accumulates streamed text; decoding happens only in [`DraftCollector::finish`].
#[derive(Debug, Default)]
pub struct DraftCollector {
    text: String,
    fragments: usize,
}

impl DraftCollector {
    pub fn push(&mut self, fragment: &str) {
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    pub fn finish(self) -> Result<ResumeDraft, AppError> {
        if self.text.trim().is_empty() {
            return Err(LlmError::EmptyContent.into());
        }
        let draft: ResumeDraft = serde_json::from_str(strip_json_fences(&self.text)).map_err(|e| {
            warn!("Draft of {} fragments is not valid JSON: {e}", self.fragments);
            AppError::UnprocessableEntity(format!("Completion was not valid resume JSON: {e}"))
        })?;
        draft.check().map_err(|errors| {
            AppError::UnprocessableEntity(format!("Completion failed validation: {errors}"))
        })?;
        Ok(draft)
    }
}

/// Runs the completion to the end and returns the decoded, validated draft.
pub async fn draft_resume(
    completions: &dyn CompletionService,
    params: &ChatParams,
) -> Result<ResumeDraft, AppError> {
    let cancel = CancellationToken::new();
    // Cancels the producer if this future is dropped mid-stream.
    let _guard = cancel.clone().drop_guard();
    let mut rx = open_chat(completions, params, cancel).await?;

    let mut collector = DraftCollector::default();
    while let Some(fragment) = rx.recv().await {
        collector.push(&fragment?);
    }
    collector.finish()
}
