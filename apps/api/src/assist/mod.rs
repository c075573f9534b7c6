//! AI resume assistant: a chat completion relayed as plain text, or
//! collected and decoded into a structured `ResumeDraft`.

pub mod draft;
pub mod handlers;
pub mod models;
pub mod prompts;
