use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failures talking to the upstream AI provider
///
/// Messages carry upstream detail for server-side logs. Callers must not
/// forward them to API consumers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request could not be sent or the connection dropped
    #[error("connection error: {0}")]
    Connection(String),

    /// Provider did not answer within the configured bound
    #[error("provider did not respond within {0:?}")]
    Timeout(std::time::Duration),

    /// Provider answered with a non-success status
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider answered 2xx with a body we could not decode
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// Provider answered without the field the relay needs
    #[error("provider response is missing {0}")]
    MissingField(&'static str),

    /// Upload metadata the provider request cannot carry
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Local I/O while preparing an upload
    #[error("failed to read staged upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Upstream HTTP status, when the provider answered at all
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn send_error(err: &reqwest::Error, timeout: std::time::Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Connection(err.to_string())
    }
}

/// Turn a non-success response into [`ProviderError::Api`], keeping the body for logs
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    ProviderError::Api { status, message }
}

pub(crate) fn decode_error(err: &reqwest::Error, timeout: std::time::Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Malformed(err.to_string())
    }
}
