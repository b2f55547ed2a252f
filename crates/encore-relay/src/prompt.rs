use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::Deserialize;

use crate::error::RelayError;

pub(crate) const PROMPT_REQUIRED: &str = "Prompt is required";

#[derive(Debug, Deserialize)]
struct PromptBody {
    #[serde(default)]
    prompt: Option<String>,
}

/// JSON `{ "prompt": "..." }` body with a non-blank prompt
///
/// Rejections render as failure envelopes rather than axum's plain-text
/// JSON errors.
#[derive(Debug)]
pub struct Prompt(pub String);

impl<S> FromRequest<S> for Prompt
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<PromptBody>::from_request(request, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "unreadable prompt body");
            RelayError::validation(PROMPT_REQUIRED)
        })?;

        body.prompt
            .map(|prompt| prompt.trim().to_string())
            .filter(|prompt| !prompt.is_empty())
            .map(Self)
            .ok_or_else(|| RelayError::validation(PROMPT_REQUIRED))
    }
}
