use secrecy::ExposeSecret;

use crate::{
    OpenAiClient,
    error::{ProviderError, Result, api_error, decode_error, send_error},
    protocol::{ImageRequest, ImageResponse},
};

/// Images requested per call
const IMAGE_COUNT: u32 = 1;

/// Square output size requested from the image model
const IMAGE_SIZE: &str = "1024x1024";

impl OpenAiClient {
    /// Generate a single square image and return its hosted URL
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let wire_request = ImageRequest {
            model: &self.models.image,
            prompt,
            n: IMAGE_COUNT,
            size: IMAGE_SIZE,
            response_format: "url",
        };

        tracing::debug!(model = %self.models.image, "sending image generation request");

        let response = self
            .client
            .post(self.endpoint("images/generations"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.timeout)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ImageResponse = response.json().await.map_err(|e| decode_error(&e, self.timeout))?;

        body.data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or(ProviderError::MissingField("data[0].url"))
    }
}
