use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default OpenAI-compatible API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upstream AI provider configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// API key; falls back to `OPENAI_API_KEY` when absent
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bound on chat and image calls (e.g. "60s")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Bound on transcription uploads (e.g. "2m")
    #[serde(default = "default_transcription_timeout")]
    pub transcription_timeout: String,
    /// Model identifiers per task
    #[serde(default)]
    pub models: ModelsConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout: default_timeout(),
            transcription_timeout: default_transcription_timeout(),
            models: ModelsConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Parsed chat/image request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("provider.timeout", &self.timeout)
    }

    /// Parsed transcription request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `transcription_timeout` is not a valid duration
    pub fn transcription_timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("provider.transcription_timeout", &self.transcription_timeout)
    }
}

/// Model identifiers used for each relay task
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    /// Chat model for lyrics and song feedback
    #[serde(default = "default_chat_model")]
    pub chat: String,
    /// Image model for cover art
    #[serde(default = "default_image_model")]
    pub image: String,
    /// Speech-to-text model for uploaded songs
    #[serde(default = "default_transcription_model")]
    pub transcription: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            chat: default_chat_model(),
            image: default_image_model(),
            transcription: default_transcription_model(),
        }
    }
}

fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    let duration =
        duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid duration for {field} '{value}': {e}"))?;

    if duration.is_zero() {
        anyhow::bail!("{field} must be greater than zero");
    }

    Ok(duration)
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_timeout() -> String {
    "60s".to_string()
}

fn default_transcription_timeout() -> String {
    "120s".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}
