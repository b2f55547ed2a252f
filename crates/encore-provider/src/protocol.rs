//! OpenAI-compatible wire format types

use serde::{Deserialize, Serialize};

// -- Chat completions --

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// -- Image generation --

#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub n: u32,
    pub size: &'static str,
    pub response_format: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

// -- Transcription --

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionResponse {
    #[serde(default)]
    pub text: String,
}
