use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl ModelInfo {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Image-capable Gemini models known to accept `generateContent` with mixed
/// text and image parts. Any other id can still be configured.
pub fn known_image_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new(
            "gemini-2.5-flash-image-preview",
            "Gemini 2.5 Flash Image (preview)",
            "Fast text-to-image and image editing",
        ),
        ModelInfo::new(
            "gemini-2.5-flash-image",
            "Gemini 2.5 Flash Image",
            "GA release of the flash image model",
        ),
        ModelInfo::new(
            "gemini-3-pro-image-preview",
            "Gemini 3 Pro Image (preview)",
            "Higher fidelity generation, slower",
        ),
    ]
}

pub fn is_known_image_model(model_id: &str) -> bool {
    known_image_models().iter().any(|m| m.id == model_id)
}
