use thiserror::Error;

pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported image format. Provide a data URL, URL, or base64 string.";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{}", UNSUPPORTED_FORMAT_MESSAGE)]
    UnsupportedImageFormat,

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    #[error("Failed to fetch image: {0}")]
    FetchError(String),

    /// The model answered but no part carried image bytes (safety block,
    /// text-only reply). Recoverable by changing the prompt.
    #[error("{0}")]
    NoImage(String),

    #[error("Gemini API error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImageGenError {
    /// HTTP status the service answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ImageGenError::ValidationError(_)
            | ImageGenError::UnsupportedImageFormat
            | ImageGenError::InvalidImageData(_) => 400,
            ImageGenError::NoImage(_) => 422,
            ImageGenError::ConfigError(_)
            | ImageGenError::FetchError(_)
            | ImageGenError::UpstreamError { .. }
            | ImageGenError::RequestError(_)
            | ImageGenError::SerializationError(_)
            | ImageGenError::IoError(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<serde_json::Error> for ImageGenError {
    fn from(e: serde_json::Error) -> Self {
        ImageGenError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
