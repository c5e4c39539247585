pub mod extract;
pub mod image_client;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::{GenerateContentResponse, GeneratedImage, InputImage},
};
use async_trait::async_trait;

pub use extract::{collect_text, extract_image};
pub use image_client::ImageClient;

/// Anything that can turn a prompt (plus optional input images) into a
/// model response. The service is written against this so tests can swap in
/// a canned backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        images: &[InputImage],
    ) -> Result<GenerateContentResponse>;

    /// Generate and unwrap the first inline image.
    async fn generate_image(&self, prompt: &str, images: &[InputImage]) -> Result<GeneratedImage> {
        let response = self.generate(prompt, images).await?;
        extract_image(&response)
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        log::debug!(
            "Configuring Gemini client for {} (timeout {}s)",
            config.model_id,
            config.timeout.as_secs()
        );

        Ok(Self {
            image_client: ImageClient::new(&config)?,
        })
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    fn model_id(&self) -> &str {
        self.image_client.model_id()
    }

    async fn generate(
        &self,
        prompt: &str,
        images: &[InputImage],
    ) -> Result<GenerateContentResponse> {
        self.image_client.generate(prompt, images).await
    }
}
