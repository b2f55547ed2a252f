use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::Config;

/// Environment variable that supplies the provider credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes the result. Validation is left to [`Config::validate`]
    /// so environment and CLI overrides can be applied first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, or TOML parsing fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Load from `path` when given, otherwise start from defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be loaded
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from TOML text, expanding placeholders first
    ///
    /// # Errors
    ///
    /// Returns an error if expansion or parsing fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))
    }

    /// Fill the provider key from `OPENAI_API_KEY` when the file left it unset
    pub fn apply_env_overrides(&mut self) {
        let configured = self
            .provider
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty());

        if configured {
            return;
        }

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.provider.api_key = Some(SecretString::from(key));
        }
    }

    /// Startup precondition check
    ///
    /// # Errors
    ///
    /// Returns a fatal configuration error if the provider credential is
    /// missing, a provider timeout cannot be parsed, or the health path
    /// cannot be routed
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_credential()?;
        self.provider.timeout()?;
        self.provider.transcription_timeout()?;
        self.validate_health_path()?;
        Ok(())
    }

    fn validate_health_path(&self) -> anyhow::Result<()> {
        let health = &self.server.health;
        if !health.enabled {
            return Ok(());
        }

        if !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/' (got `{}`)", health.path);
        }

        // `/` is the liveness route
        if health.path == "/" {
            anyhow::bail!("server.health.path must not be `/`");
        }

        Ok(())
    }

    fn validate_credential(&self) -> anyhow::Result<()> {
        let Some(ref key) = self.provider.api_key else {
            anyhow::bail!("provider API key is not configured (set {API_KEY_ENV} or provider.api_key)");
        };

        if key.expose_secret().trim().is_empty() {
            anyhow::bail!("provider API key must not be empty (set {API_KEY_ENV} or provider.api_key)");
        }

        Ok(())
    }
}
