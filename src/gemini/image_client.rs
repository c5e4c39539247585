use crate::{
    config::GeminiConfig,
    error::{ImageGenError, Result},
    models::{
        gemini::ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, InputImage,
    },
};
use reqwest::Client;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model_id: String,
}

impl ImageClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model_id
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn generate(
        &self,
        prompt: &str,
        images: &[InputImage],
    ) -> Result<GenerateContentResponse> {
        let body = GenerateContentRequest::new(prompt, images);

        log::info!(
            "Generating image with model: {} ({} input image(s))",
            self.model_id,
            images.len()
        );
        log::debug!("Prompt: {}", prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                ImageGenError::RequestError(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = upstream_message(&text);
            log::error!("Gemini returned {}: {}", status, message);
            return Err(ImageGenError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ImageGenError::SerializationError(format!("Failed to decode Gemini response: {}", e))
        })
    }
}

/// Prefer the `error.message` of a Google API error envelope, fall back to
/// the raw body.
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}
