use std::sync::Arc;

use axum::{Json, extract::State};
use encore_provider::ChatPrompt;

use crate::{
    RelayState,
    envelope::{Envelope, Lyrics},
    error::{RelayError, Result},
    prompt::Prompt,
};

const SONGWRITER: &str = "You are a creative songwriter. Write original, emotionally resonant song lyrics \
     with a clear structure (verses, chorus, and a bridge where it fits). Label each section.";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.8;

pub(crate) const LYRICS_FAILED: &str = "Failed to generate lyrics";

/// Handle `POST /generate-lyrics`
pub(crate) async fn generate_lyrics(
    State(state): State<Arc<RelayState>>,
    Prompt(prompt): Prompt,
) -> Result<Json<Envelope<Lyrics>>> {
    tracing::debug!(prompt_chars = prompt.chars().count(), "generating lyrics");

    let request = format!("Write song lyrics about: {prompt}");
    let lyrics = state
        .client
        .chat(&ChatPrompt {
            system: SONGWRITER,
            user: &request,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        })
        .await
        .map_err(|e| RelayError::provider(LYRICS_FAILED, e))?;

    Ok(Json(Envelope::ok(Lyrics { lyrics })))
}
