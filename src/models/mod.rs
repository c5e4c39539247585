pub mod common;
pub mod gemini;
pub mod image;

pub use common::*;
pub use gemini::{GenerateContentRequest, GenerateContentResponse, Part};
pub use image::*;
