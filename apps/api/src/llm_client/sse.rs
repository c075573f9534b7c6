//! Incremental server-sent-events decoding for the Messages streaming API.

use bytes::BytesMut;
use serde::Deserialize;

use crate::llm_client::LlmError;

/// Splits a byte stream into `data:` payloads. Network chunks may end
/// mid-line or mid-codepoint, so bytes are buffered until a newline arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: BytesMut,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos + 1);
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flushes a trailing line that never got its newline.
    pub fn finish(&mut self) -> Option<String> {
        let line = self.buf.split();
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    line.strip_prefix("data:")
        .map(|data| data.trim_start().to_string())
        .filter(|data| !data.is_empty())
}

#[derive(Debug, PartialEq)]
pub enum StreamEvent {
    Text(String),
    Stop,
    Ignored,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    ContentBlockDelta { delta: WireDelta },
    MessageStop,
    Error { error: WireError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

pub fn parse_event(data: &str) -> Result<StreamEvent, LlmError> {
    let event: WireEvent = serde_json::from_str(data)?;
    Ok(match event {
        WireEvent::ContentBlockDelta {
            delta: WireDelta::TextDelta { text },
        } => StreamEvent::Text(text),
        WireEvent::MessageStop => StreamEvent::Stop,
        WireEvent::Error { error } => return Err(LlmError::Stream(error.message)),
        _ => StreamEvent::Ignored,
    })
}
