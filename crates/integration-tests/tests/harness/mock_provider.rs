//! Mock provider backend for integration tests
//!
//! Implements the three OpenAI-compatible endpoints the relay calls and
//! records what it was sent.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Upstream error text the relay must never pass through to its clients
pub const UPSTREAM_SECRET: &str = "upstream-internal-detail-7f3a";

pub const DEFAULT_CHAT_REPLY: &str = "Hello from mock provider";
pub const DEFAULT_IMAGE_URL: &str = "https://images.example.com/cover.png";

/// How the mock answers each endpoint
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub chat_reply: String,
    pub image_url: Option<String>,
    pub transcript: String,
    pub fail_chat: bool,
    pub fail_images: bool,
    pub fail_transcription: bool,
    /// Delay before every response
    pub delay: Option<Duration>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            chat_reply: DEFAULT_CHAT_REPLY.to_owned(),
            image_url: Some(DEFAULT_IMAGE_URL.to_owned()),
            transcript: "I walked the empty streets until the morning light".to_owned(),
            fail_chat: false,
            fail_images: false,
            fail_transcription: false,
            delay: None,
        }
    }
}

/// An audio file received by the transcription endpoint
#[derive(Debug, Clone)]
pub struct ReceivedAudio {
    pub file_name: String,
    pub content_type: Option<String>,
    pub model: Option<String>,
    pub len: usize,
}

/// Mock provider that returns predictable responses
pub struct MockProvider {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: MockBehavior,
    chat_count: AtomicU32,
    image_count: AtomicU32,
    transcription_count: AtomicU32,
    chat_requests: Mutex<Vec<Value>>,
    image_requests: Mutex<Vec<Value>>,
    audio: Mutex<Vec<ReceivedAudio>>,
    authorization: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Start a mock that succeeds on every endpoint
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockBehavior::default()).await
    }

    /// Start a mock with custom behavior
    pub async fn start_with(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            chat_count: AtomicU32::new(0),
            image_count: AtomicU32::new(0),
            transcription_count: AtomicU32::new(0),
            chat_requests: Mutex::new(Vec::new()),
            image_requests: Mutex::new(Vec::new()),
            audio: Mutex::new(Vec::new()),
            authorization: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat))
            .route("/v1/images/generations", routing::post(handle_images))
            .route(
                "/v1/audio/transcriptions",
                routing::post(handle_transcription).layer(DefaultBodyLimit::disable()),
            )
            .layer(axum::middleware::from_fn_with_state(Arc::clone(&state), record_auth))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the provider
    ///
    /// Includes `/v1` since the client appends paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    pub fn image_count(&self) -> u32 {
        self.state.image_count.load(Ordering::Relaxed)
    }

    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    /// Chat request bodies, in arrival order
    pub fn chat_requests(&self) -> Vec<Value> {
        self.state.chat_requests.lock().unwrap().clone()
    }

    /// Image request bodies, in arrival order
    pub fn image_requests(&self) -> Vec<Value> {
        self.state.image_requests.lock().unwrap().clone()
    }

    /// Audio files received for transcription, in arrival order
    pub fn received_audio(&self) -> Vec<ReceivedAudio> {
        self.state.audio.lock().unwrap().clone()
    }

    /// `Authorization` headers seen on every request
    pub fn authorization_headers(&self) -> Vec<String> {
        self.state.authorization.lock().unwrap().clone()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn record_auth(
    State(state): State<Arc<MockState>>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let header = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    state.authorization.lock().unwrap().push(header);

    if let Some(delay) = state.behavior.delay {
        tokio::time::sleep(delay).await;
    }

    next.run(request).await
}

fn upstream_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": UPSTREAM_SECRET, "type": "server_error" } })),
    )
        .into_response()
}

async fn handle_chat(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.chat_count.fetch_add(1, Ordering::Relaxed);
    state.chat_requests.lock().unwrap().push(body.clone());

    if state.behavior.fail_chat {
        return upstream_failure();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": state.behavior.chat_reply },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    }))
    .into_response()
}

async fn handle_images(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.image_count.fetch_add(1, Ordering::Relaxed);
    state.image_requests.lock().unwrap().push(body);

    if state.behavior.fail_images {
        return upstream_failure();
    }

    let data = state
        .behavior
        .image_url
        .as_ref()
        .map_or_else(Vec::new, |url| vec![json!({ "url": url })]);

    Json(json!({ "created": 1_700_000_000, "data": data })).into_response()
}

async fn handle_transcription(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);

    let mut audio = ReceivedAudio {
        file_name: String::new(),
        content_type: None,
        model: None,
        len: 0,
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => {
                audio.file_name = field.file_name().unwrap_or_default().to_owned();
                audio.content_type = field.content_type().map(str::to_owned);
                audio.len = field.bytes().await.unwrap().len();
            }
            "model" => audio.model = Some(field.text().await.unwrap()),
            _ => {}
        }
    }

    state.audio.lock().unwrap().push(audio);

    if state.behavior.fail_transcription {
        return upstream_failure();
    }

    Json(json!({ "text": state.behavior.transcript })).into_response()
}
