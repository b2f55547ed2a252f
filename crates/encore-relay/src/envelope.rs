use serde::Serialize;

/// Uniform `{ success, ... }` wrapper returned by every relay endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self { success: true, payload }
    }
}

impl Envelope<ErrorBody> {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: ErrorBody { error: error.into() },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Lyrics {
    pub lyrics: String,
}

#[derive(Debug, Serialize)]
pub struct CoverArt {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct Feedback {
    pub feedback: String,
}
