use crate::{
    error::{ImageGenError, Result},
    models::{GenerateContentResponse, GeneratedImage, Part},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

const NO_IMAGE_MESSAGE: &str = "No image returned by the model. Try refining the prompt.";
const DEFAULT_MIME_TYPE: &str = "image/png";

/// Text parts of the response, in order.
pub fn collect_text(response: &GenerateContentResponse) -> Vec<String> {
    response
        .parts()
        .filter_map(|part| match part {
            Part::Text { text } if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Return the first inline image of the response. Text parts are logged and
/// dropped.
pub fn extract_image(response: &GenerateContentResponse) -> Result<GeneratedImage> {
    for text in collect_text(response) {
        log::info!("Model says: {}", text);
    }

    let inline = response.parts().find_map(|part| match part {
        Part::InlineData { inline_data } if !inline_data.data.is_empty() => Some(inline_data),
        _ => None,
    });

    let Some(inline) = inline else {
        let reason = no_image_reason(response);
        log::warn!("Model returned no image bytes ({})", reason.as_deref().unwrap_or("no reason given"));
        return Err(ImageGenError::NoImage(match reason {
            Some(reason) => format!("{} ({})", NO_IMAGE_MESSAGE, reason),
            None => NO_IMAGE_MESSAGE.to_string(),
        }));
    };

    let bytes = STANDARD.decode(inline.data.trim()).map_err(|e| {
        ImageGenError::SerializationError(format!("Inline image data is not valid base64: {}", e))
    })?;

    let mime_type = if inline.mime_type.is_empty() {
        DEFAULT_MIME_TYPE.to_string()
    } else {
        inline.mime_type.clone()
    };

    log::debug!(
        "Extracted {} bytes of {} from {}",
        bytes.len(),
        mime_type,
        response.model_version.as_deref().unwrap_or("unknown model version")
    );
    Ok(GeneratedImage { mime_type, bytes })
}

fn no_image_reason(response: &GenerateContentResponse) -> Option<String> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(block_reason) = &feedback.block_reason {
            return Some(match &feedback.block_reason_message {
                Some(message) => format!("prompt blocked: {} - {}", block_reason, message),
                None => format!("prompt blocked: {}", block_reason),
            });
        }
    }

    response
        .candidates
        .iter()
        .filter_map(|c| c.finish_reason.as_deref())
        .find(|reason| *reason != "STOP")
        .map(|reason| format!("finish reason: {}", reason))
}
