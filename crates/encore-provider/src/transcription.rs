use std::path::Path;

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use tokio_util::io::ReaderStream;

use crate::{
    OpenAiClient,
    error::{ProviderError, Result, api_error, decode_error, send_error},
    protocol::TranscriptionResponse,
};

/// Audio staged on disk, streamed to the transcription endpoint
#[derive(Debug, Clone, Copy)]
pub struct AudioFile<'a> {
    /// Location of the staged bytes
    pub path: &'a Path,
    /// Name reported upstream; the provider infers the codec from its extension
    pub file_name: &'a str,
    /// MIME type of the audio
    pub content_type: &'a str,
}

impl OpenAiClient {
    /// Transcribe a staged audio file, returning the raw transcript text
    ///
    /// The text may be empty when the provider hears no speech; callers
    /// decide what counts as usable.
    pub async fn transcribe(&self, audio: &AudioFile<'_>) -> Result<String> {
        let file = tokio::fs::File::open(audio.path).await?;
        let length = file.metadata().await?.len();

        tracing::debug!(
            model = %self.models.transcription,
            bytes = length,
            "sending transcription request"
        );

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(audio.file_name.to_string())
            .mime_str(audio.content_type)
            .map_err(|e| ProviderError::InvalidUpload(format!("content type '{}': {e}", audio.content_type)))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.models.transcription.clone());

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.transcription_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_error(&e, self.transcription_timeout))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| decode_error(&e, self.transcription_timeout))?;

        tracing::debug!(chars = result.text.len(), "transcription complete");

        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, extract::Multipart, extract::State, http::StatusCode, routing::post};
    use serde_json::json;

    use super::*;
    use crate::test_support::{client_for, serve};

    #[derive(Debug, Default)]
    struct Seen {
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
        model: Option<String>,
    }

    async fn whisper(State(seen): State<Arc<Mutex<Seen>>>, mut multipart: Multipart) -> Json<serde_json::Value> {
        while let Ok(Some(field)) = multipart.next_field().await {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "file" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.unwrap().to_vec();
                    let mut seen = seen.lock().unwrap();
                    seen.file_name = file_name;
                    seen.content_type = content_type;
                    seen.bytes = bytes;
                }
                "model" => {
                    let model = field.text().await.unwrap();
                    seen.lock().unwrap().model = Some(model);
                }
                _ => {}
            }
        }

        Json(json!({ "text": "hello from the chorus" }))
    }

    fn staged(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[tokio::test]
    async fn streams_file_and_model() {
        let seen: Arc<Mutex<Seen>> = Arc::default();
        let router = Router::new()
            .route("/v1/audio/transcriptions", post(whisper))
            .with_state(Arc::clone(&seen));
        let client = client_for(serve(router).await, "5s");

        let file = staged(b"RIFF....WAVEfmt ");
        let text = client
            .transcribe(&AudioFile {
                path: file.path(),
                file_name: "demo.wav",
                content_type: "audio/wav",
            })
            .await
            .unwrap();

        assert_eq!(text, "hello from the chorus");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.file_name.as_deref(), Some("demo.wav"));
        assert_eq!(seen.content_type.as_deref(), Some("audio/wav"));
        assert_eq!(seen.bytes, b"RIFF....WAVEfmt ");
        assert_eq!(seen.model.as_deref(), Some("whisper-1"));
    }

    #[tokio::test]
    async fn provider_failure_is_api_error() {
        let router = Router::new().route(
            "/v1/audio/transcriptions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let client = client_for(serve(router).await, "5s");

        let file = staged(b"ID3");
        let err = client
            .transcribe(&AudioFile {
                path: file.path(),
                file_name: "demo.mp3",
                content_type: "audio/mpeg",
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn missing_staged_file_is_io_error() {
        let client = client_for("127.0.0.1:9".parse().unwrap(), "5s");

        let err = client
            .transcribe(&AudioFile {
                path: Path::new("/nonexistent/encore/upload.wav"),
                file_name: "upload.wav",
                content_type: "audio/wav",
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Io(_)));
    }
}
