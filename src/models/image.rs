use crate::error::{ImageGenError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<()> {
        validate_prompt(&self.prompt)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    pub prompt: String,
    /// Data URLs, http(s) URLs or bare base64, in the order they are sent
    /// to the model.
    pub images: Vec<String>,
}

impl EditRequest {
    pub fn validate(&self) -> Result<()> {
        validate_prompt(&self.prompt)?;
        if self.images.is_empty() {
            return Err(ImageGenError::ValidationError(
                "images must contain at least one image".into(),
            ));
        }
        Ok(())
    }
}

fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(ImageGenError::ValidationError(
            "prompt must not be empty".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_base64: String,
    pub model_id: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model_id: String,
}

impl HealthResponse {
    pub fn ok(model_id: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            model_id: model_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A caller-supplied image after source resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl InputImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Image bytes pulled out of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn into_response(self, model_id: impl Into<String>) -> ImageResponse {
        ImageResponse {
            image_base64: self.to_base64(),
            model_id: model_id.into(),
            mime_type: self.mime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_validation() {
        assert!(GenerateRequest { prompt: "a cat".into() }.validate().is_ok());
        assert!(matches!(
            GenerateRequest { prompt: "  ".into() }.validate(),
            Err(ImageGenError::ValidationError(_))
        ));
    }

    #[test]
    fn test_edit_requires_images() {
        let req = EditRequest {
            prompt: "make it blue".into(),
            images: vec![],
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("images"));
    }

    #[test]
    fn test_image_response_uses_camel_case() {
        let image = GeneratedImage {
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        let json = serde_json::to_value(image.into_response("m")).unwrap();
        assert_eq!(json["imageBase64"], "AQID");
        assert_eq!(json["modelId"], "m");
        assert_eq!(json["mimeType"], "image/png");
    }
}
