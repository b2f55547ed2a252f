//! Relay endpoints for lyric generation, cover art, and song analysis
//!
//! Each handler validates its input, makes one (or, for analysis, two
//! sequential) provider calls, and answers with a `{ success, ... }` envelope.

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod analysis;
mod cover_art;
mod envelope;
mod error;
mod lyrics;
mod prompt;
mod staging;
mod upload;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::post};
use encore_provider::OpenAiClient;
use staging::Staging;
use upload::UPLOAD_BODY_LIMIT;

/// Shared, read-only state for relay handlers
pub struct RelayState {
    client: OpenAiClient,
    staging: Staging,
}

impl RelayState {
    fn new(client: OpenAiClient, staging: Staging) -> Self {
        Self { client, staging }
    }
}

/// Build relay state from configuration
///
/// # Errors
///
/// Returns an error if the provider client cannot be built or the staging
/// directory cannot be created
pub fn build_state(config: &encore_config::Config) -> anyhow::Result<Arc<RelayState>> {
    let client = OpenAiClient::from_config(&config.provider)
        .map_err(|e| anyhow::anyhow!("failed to initialize provider client: {e}"))?;

    let staging_dir = config.server.staging_dir();
    let staging = Staging::create(staging_dir.clone())
        .map_err(|e| anyhow::anyhow!("failed to create staging directory {}: {e}", staging_dir.display()))?;

    tracing::debug!(
        staging_dir = %staging_dir.display(),
        base_url = %config.provider.base_url,
        "relay initialized"
    );

    Ok(Arc::new(RelayState::new(client, staging)))
}

/// Create the relay endpoint router
pub fn endpoint_router() -> Router<Arc<RelayState>> {
    Router::new()
        .route("/generate-lyrics", post(lyrics::generate_lyrics))
        .route("/generate-cover-art", post(cover_art::generate_cover_art))
        .route(
            "/analyze-song",
            post(analysis::analyze_song).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
