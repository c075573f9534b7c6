//! LLM client: the single point of entry for all completion calls.
//!
//! No other module may call the Anthropic API directly. Completions are
//! streamed; a spawned task decodes server-sent events and forwards text
//! fragments through a bounded channel until the message stops or the
//! caller's cancellation token fires.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod scripted;
pub mod sse;

use sse::{parse_event, SseDecoder, StreamEvent};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_RETRIES: u32 = 3;
const CHUNK_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// One completion: a system prompt plus user/assistant turns.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatTurn>,
}

/// Text fragments in arrival order. The channel closes when the completion ends.
pub type ChunkReceiver = mpsc::Receiver<Result<String, LlmError>>;

/// Anything that can stream a completion. Carried in `AppState` as
/// `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkReceiver, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// System turns travel in the `system` field, never as messages.
fn request_body<'a>(config: &'a LlmConfig, request: &'a CompletionRequest) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model: &config.model,
        max_tokens: config.max_tokens,
        system: &request.system,
        messages: request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    ChatRole::Assistant => "assistant",
                    _ => "user",
                },
                content: &m.content,
            })
            .collect(),
        stream: true,
    }
}

/// The Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .build()?,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Opens the streaming response. 429 and 5xx answers are retried with
    /// exponential backoff; once bytes start flowing nothing is retried.
    async fn open(&self, request: &CompletionRequest) -> Result<Response, LlmError> {
        let body = request_body(&self.config, request);
        let mut last_error = LlmError::RateLimited {
            retries: MAX_RETRIES,
        };

        for attempt in 0..MAX_RETRIES {
            if let Some(delay) = backoff(attempt) {
                warn!(
                    "Completion attempt {attempt} failed ({last_error}), retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let sent = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await;
            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    last_error = LlmError::Http(e);
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                debug!("Completion stream opened on attempt {}", attempt + 1);
                return Ok(response);
            }

            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            let error = LlmError::Api {
                status: status.as_u16(),
                message,
            };
            if !is_retryable(status) {
                return Err(error);
            }
            last_error = error;
        }

        Err(last_error)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// No delay before the first attempt, then 1s, 2s, ...
fn backoff(attempt: u32) -> Option<Duration> {
    attempt
        .checked_sub(1)
        .map(|n| Duration::from_millis(1000 << n))
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkReceiver, LlmError> {
        let response = self.open(&request).await?;
        let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
        tokio::spawn(pump(response.bytes_stream(), tx, cancel));
        Ok(rx)
    }
}

/// Forwards decoded text fragments until the stream ends or is cancelled.
async fn pump<S, E>(body: S, tx: mpsc::Sender<Result<String, LlmError>>, cancel: CancellationToken)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<LlmError>,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseDecoder::default();
    let mut fragments = 0usize;

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Completion stream cancelled after {fragments} fragments");
                return;
            }
            next = body.next() => next,
        };

        let (payloads, exhausted) = match next {
            Some(Ok(bytes)) => (decoder.push(&bytes), false),
            Some(Err(e)) => {
                let _ = tx.send(Err(e.into())).await;
                return;
            }
            None => (decoder.finish().into_iter().collect(), true),
        };

        for data in payloads {
            match parse_event(&data) {
                Ok(StreamEvent::Text(text)) => {
                    fragments += 1;
                    if tx.send(Ok(text)).await.is_err() {
                        debug!("Completion receiver dropped after {fragments} fragments");
                        return;
                    }
                }
                Ok(StreamEvent::Stop) => {
                    debug!("Completion stream finished with {fragments} fragments");
                    return;
                }
                Ok(StreamEvent::Ignored) => {}
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }

        if exhausted {
            warn!("Completion body ended without message_stop after {fragments} fragments");
            let _ = tx
                .send(Err(LlmError::Stream("stream ended before message_stop".into())))
                .await;
            return;
        }
    }
}

/// Removes a surrounding markdown code fence (with or without a language tag).
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
