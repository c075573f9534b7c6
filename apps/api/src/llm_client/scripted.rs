//! Canned completion streams for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{ChunkReceiver, CompletionRequest, CompletionService, LlmError};

/// Replays fixed fragments and records the last request it was given.
#[derive(Default)]
pub struct ScriptedCompletions {
    fragments: Vec<Result<String, String>>,
    seen: Mutex<Option<CompletionRequest>>,
}

impl ScriptedCompletions {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            seen: Mutex::new(None),
        }
    }

    pub fn failing_after(fragments: &[&str], message: &str) -> Self {
        let mut scripted = Self::new(fragments);
        scripted.fragments.push(Err(message.to_string()));
        scripted
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletions {
    async fn stream(
        &self,
        request: CompletionRequest,
        _cancel: CancellationToken,
    ) -> Result<ChunkReceiver, LlmError> {
        *self.seen.lock().unwrap() = Some(request);
        let (tx, rx) = mpsc::channel(self.fragments.len().max(1));
        for fragment in &self.fragments {
            let item = fragment.clone().map_err(LlmError::Stream);
            tx.send(item).await.unwrap();
        }
        Ok(rx)
    }
}
