use secrecy::ExposeSecret;

use crate::{
    OpenAiClient,
    error::{ProviderError, Result, api_error, decode_error, send_error},
    protocol::{ChatMessage, ChatRequest, ChatResponse},
};

/// One system + user exchange with fixed sampling settings
#[derive(Debug, Clone, Copy)]
pub struct ChatPrompt<'a> {
    /// Persona instruction sent as the system message
    pub system: &'a str,
    /// Caller-supplied content sent as the user message
    pub user: &'a str,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl OpenAiClient {
    /// Run a chat completion and return the first choice's text
    pub async fn chat(&self, prompt: &ChatPrompt<'_>) -> Result<String> {
        let wire_request = ChatRequest {
            model: &self.models.chat,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        tracing::debug!(
            model = %self.models.chat,
            max_tokens = prompt.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.timeout)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ChatResponse = response.json().await.map_err(|e| decode_error(&e, self.timeout))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::MissingField("choices[0].message.content"))
    }
}
