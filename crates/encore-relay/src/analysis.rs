//! Song analysis: transcribe an upload, then ask for an A&R-style review
//!
//! ```text
//! UploadReceived -> Transcribing -> TranscriptOk -> Analyzing -> FeedbackOk
//!                                                             -> FeedbackDegraded
//!                                -> TranscriptEmpty -> Acknowledged
//! ```
//!
//! Every terminal state is a success envelope. Only a missing file (400) or
//! a failure to stage the upload (500) produce an error.

use std::sync::Arc;

use axum::{Json, extract::State};
use encore_provider::{AudioFile, ChatPrompt, OpenAiClient};

use crate::{
    RelayState,
    envelope::{Envelope, Feedback},
    error::{RelayError, Result},
    upload::AudioUpload,
};

const REVIEWER: &str = "You are an experienced A&R representative at a record label. \
     Review the song lyrics you are given and respond with honest, constructive feedback \
     covering lyrical content, structure, hook strength, and commercial potential. \
     Keep it encouraging and actionable.";

const MAX_TOKENS: u32 = 400;
const TEMPERATURE: f64 = 0.7;

/// Transcripts at or below this many characters are treated as unusable
pub(crate) const MIN_TRANSCRIPT_CHARS: usize = 5;

pub(crate) const ANALYSIS_FAILED: &str = "Failed to analyze song";

/// Substituted when the review call fails after a good transcript
pub(crate) const FEEDBACK_UNAVAILABLE: &str = "Thanks for sharing your track! We transcribed your song \
     but couldn't generate detailed feedback right now. Please try again in a few minutes.";

/// How an analysis request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    FeedbackOk,
    FeedbackDegraded,
    Acknowledged,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::FeedbackOk => "feedback_ok",
            Self::FeedbackDegraded => "feedback_degraded",
            Self::Acknowledged => "acknowledged",
        }
    }
}

/// Reply used when no usable transcript could be produced
pub(crate) fn acknowledgment(file_name: &str) -> String {
    format!(
        "We received your track \"{file_name}\", but transcription failed, so we couldn't review the lyrics. \
         Try uploading a recording with clearer vocals, or paste your lyrics for written feedback."
    )
}

/// Handle `POST /analyze-song`
pub(crate) async fn analyze_song(
    State(state): State<Arc<RelayState>>,
    upload: AudioUpload,
) -> Result<Json<Envelope<Feedback>>> {
    tracing::debug!(
        file = %upload.file_name,
        bytes = upload.bytes.len(),
        content_type = %upload.content_type,
        "song upload received"
    );

    let transcript = transcribe(&state, &upload).await?;
    let (feedback, outcome) = review(&state.client, &upload.file_name, &transcript).await;

    tracing::info!(file = %upload.file_name, outcome = outcome.as_str(), "song analysis finished");

    Ok(Json(Envelope::ok(Feedback { feedback })))
}

/// Stage the upload, transcribe it, and delete the staged copy
///
/// Transcription failures yield an empty transcript; only staging errors
/// are returned.
async fn transcribe(state: &RelayState, upload: &AudioUpload) -> Result<String> {
    let staged = state
        .staging
        .stage(&upload.file_name, upload.bytes.clone())
        .await
        .map_err(|e| RelayError::internal(ANALYSIS_FAILED, e))?;

    let result = state
        .client
        .transcribe(&AudioFile {
            path: staged.path(),
            file_name: staged.upload_name(),
            content_type: &upload.content_type,
        })
        .await;

    if let Err(e) = staged.remove() {
        tracing::error!(error = %e, "failed to remove staged upload");
    }

    match result {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(
                upstream_status = ?e.status(),
                error = %e,
                "transcription failed, falling back to acknowledgment"
            );
            Ok(String::new())
        }
    }
}

async fn review(client: &OpenAiClient, file_name: &str, transcript: &str) -> (String, Outcome) {
    let transcript = transcript.trim();

    if transcript.chars().count() <= MIN_TRANSCRIPT_CHARS {
        return (acknowledgment(file_name), Outcome::Acknowledged);
    }

    let request = format!("Here are the transcribed lyrics of a song demo:\n\n{transcript}\n\nPlease review them.");
    let result = client
        .chat(&ChatPrompt {
            system: REVIEWER,
            user: &request,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        })
        .await;

    match result {
        Ok(feedback) => (feedback, Outcome::FeedbackOk),
        Err(e) => {
            tracing::error!(
                upstream_status = ?e.status(),
                error = %e,
                "feedback generation failed, using fallback message"
            );
            (FEEDBACK_UNAVAILABLE.to_string(), Outcome::FeedbackDegraded)
        }
    }
}
