pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod sources;

#[cfg(feature = "server")]
pub mod server;

pub use config::{AllowedOrigins, GeminiConfig, ServerConfig};
pub use error::{ImageGenError, Result};
pub use gemini::{GeminiClient, ImageClient, ImageGenerator};
pub use models::{
    EditRequest, GenerateRequest, GeneratedImage, HealthResponse, ImageResponse, InputImage,
};
pub use sources::{ImageSource, ImageSourceResolver};
