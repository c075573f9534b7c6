use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Profile and resume persistence. Postgres in production, in-memory in tests.
    pub store: Arc<dyn ProfileStore>,
    /// Streaming chat completions. Default: the Anthropic `LlmClient`.
    pub completions: Arc<dyn CompletionService>,
    pub config: Config,
}
