use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use encore_provider::ProviderError;
use thiserror::Error;

use crate::envelope::Envelope;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay failures, each mapped to a failure envelope
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client input missing or invalid; the message is shown as-is
    #[error("{0}")]
    Validation(String),

    /// Upstream call failed; only `message` reaches the client
    #[error("{message}: {source}")]
    Provider {
        message: &'static str,
        #[source]
        source: ProviderError,
    },

    /// Local processing failed; only `message` reaches the client
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn provider(message: &'static str, source: ProviderError) -> Self {
        Self::Provider { message, source }
    }

    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Provider { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(message) => message.as_str(),
            Self::Provider { message, .. } | Self::Internal { message, .. } => *message,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(message) => {
                tracing::debug!(error = %message, "rejected invalid request");
            }
            Self::Provider { message, source } => {
                tracing::error!(
                    operation = %message,
                    upstream_status = ?source.status(),
                    error = %source,
                    "provider call failed"
                );
            }
            Self::Internal { message, source } => {
                tracing::error!(operation = %message, error = %source, "internal relay error");
            }
        }

        let status = self.status_code();
        (status, Json(Envelope::failed(self.client_message()))).into_response()
    }
}
