//! Chat-completion client used for narrative commentary on analysis
//! results. Only the request/response contract lives here; the provider is
//! external.

pub mod client;
pub mod gate;
pub mod prompts;

use serde::{Deserialize, Serialize};

pub use client::{ChatTransport, HttpTransport, InsightClient};
pub use gate::{CallGate, Clock, SystemClock};
pub use prompts::Language;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}
