use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    RelayState,
    envelope::{CoverArt, Envelope},
    error::{RelayError, Result},
    prompt::Prompt,
};

pub(crate) const COVER_ART_FAILED: &str = "Failed to generate cover art";

/// Frame a user idea as an album-cover request with no lettering
pub(crate) fn cover_art_prompt(idea: &str) -> String {
    format!(
        "Album cover art for a song: {idea}. Artistic, high quality, visually striking. \
         Do not include any text, letters, or words in the image."
    )
}

/// Handle `POST /generate-cover-art`
pub(crate) async fn generate_cover_art(
    State(state): State<Arc<RelayState>>,
    Prompt(idea): Prompt,
) -> Result<Json<Envelope<CoverArt>>> {
    tracing::debug!(prompt_chars = idea.chars().count(), "generating cover art");

    let image_url = state
        .client
        .generate_image(&cover_art_prompt(&idea))
        .await
        .map_err(|e| RelayError::provider(COVER_ART_FAILED, e))?;

    Ok(Json(Envelope::ok(CoverArt { image_url })))
}
