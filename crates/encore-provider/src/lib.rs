//! Client for the OpenAI-compatible provider behind the Encore relay
//!
//! Each call is a single attempt bounded by a timeout; nothing is retried.

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod chat;
mod error;
mod http_client;
mod images;
mod protocol;
mod transcription;

use std::time::Duration;

use encore_config::{ModelsConfig, ProviderConfig};
use reqwest::Client;
use secrecy::SecretString;
use url::Url;

pub use chat::ChatPrompt;
pub use error::{ProviderError, Result};
pub use transcription::AudioFile;

/// Handle to the upstream provider, shared by all relay handlers
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    base_url: Url,
    timeout: Duration,
    transcription_timeout: Duration,
    models: ModelsConfig,
}

impl OpenAiClient {
    /// Build the client from provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a timeout is invalid, or
    /// the HTTP client cannot be constructed
    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("provider API key is required"))?;

        Ok(Self {
            client: http_client::http_client()?,
            api_key,
            base_url: config.base_url.clone(),
            timeout: config.timeout()?,
            transcription_timeout: config.transcription_timeout()?,
            models: config.models.clone(),
        })
    }

    /// Join an API path onto the configured base URL
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}
