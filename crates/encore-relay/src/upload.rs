use axum::{
    extract::{FromRequest, Multipart, Request, multipart::Field, multipart::MultipartError},
    http::StatusCode,
};
use bytes::{Bytes, BytesMut};

use crate::error::RelayError;

/// Largest accepted audio file (50 MiB)
pub const MAX_UPLOAD_BYTES: usize = 50 << 20;

/// Request body cap for the upload route: the file plus multipart framing
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + (1 << 20);

pub(crate) const NO_FILE: &str = "No audio file uploaded";
pub(crate) const FILE_TOO_LARGE: &str = "Audio file exceeds the 50 MiB upload limit";
const NOT_MULTIPART: &str = "Expected a multipart/form-data upload";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The single audio file from a `multipart/form-data` body
///
/// The first part that carries a filename is taken, whatever its field
/// name; text fields are skipped.
#[derive(Debug)]
pub struct AudioUpload {
    /// Name the client gave the file
    pub file_name: String,
    /// Declared MIME type, or `application/octet-stream`
    pub content_type: String,
    pub bytes: Bytes,
}

impl<S> FromRequest<S> for AudioUpload
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(request, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "upload is not multipart");
            RelayError::validation(NOT_MULTIPART)
        })?;

        while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
            let Some(file_name) = field.file_name().map(str::to_string).filter(|name| !name.is_empty()) else {
                continue;
            };

            let content_type = field
                .content_type()
                .filter(|ct| ct.contains('/'))
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string();

            let bytes = read_capped(field).await?;
            if bytes.is_empty() {
                return Err(RelayError::validation(NO_FILE));
            }

            return Ok(Self {
                file_name,
                content_type,
                bytes,
            });
        }

        Err(RelayError::validation(NO_FILE))
    }
}

/// Buffer a file part, failing as soon as it passes [`MAX_UPLOAD_BYTES`]
async fn read_capped(mut field: Field<'_>) -> Result<Bytes, RelayError> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(&e))? {
        if buffer.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(RelayError::validation(FILE_TOO_LARGE));
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

fn multipart_error(err: &MultipartError) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::validation(FILE_TOO_LARGE)
    } else {
        tracing::debug!(error = %err.body_text(), "malformed multipart body");
        RelayError::validation(NOT_MULTIPART)
    }
}
