use crate::{
    error::{ImageGenError, Result},
    models::InputImage,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The three shapes an `/edit` image may arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// `data:image/<subtype>;base64,<payload>`
    DataUrl { mime_type: &'a str, payload: &'a str },
    /// `http://` or `https://`
    Url(&'a str),
    /// Anything else; only valid if it decodes as base64.
    Base64(&'a str),
}

impl<'a> ImageSource<'a> {
    pub fn classify(input: &'a str) -> Self {
        let input = input.trim();

        if let Some((mime_type, payload)) = parse_data_url(input) {
            return ImageSource::DataUrl { mime_type, payload };
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            return ImageSource::Url(input);
        }
        ImageSource::Base64(input)
    }
}

fn parse_data_url(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    let subtype = mime_type.strip_prefix("image/")?;

    let subtype_ok =
        !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let payload_ok = !payload.is_empty()
        && payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=');

    (subtype_ok && payload_ok).then_some((mime_type, payload))
}

/// Guess an image media type from its leading bytes. Unknown data is
/// labelled PNG and left for the model to reject.
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}

#[derive(Clone)]
pub struct ImageSourceResolver {
    client: Client,
}

impl ImageSourceResolver {
    pub fn new() -> Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn resolve(&self, input: &str) -> Result<InputImage> {
        match ImageSource::classify(input) {
            ImageSource::DataUrl { mime_type, payload } => {
                let bytes = STANDARD
                    .decode(payload)
                    .map_err(|e| ImageGenError::InvalidImageData(e.to_string()))?;
                Ok(InputImage::new(mime_type, bytes))
            }
            ImageSource::Url(url) => self.fetch(url).await,
            ImageSource::Base64(raw) => {
                let bytes = STANDARD
                    .decode(raw)
                    .map_err(|_| ImageGenError::UnsupportedImageFormat)?;
                if bytes.is_empty() {
                    return Err(ImageGenError::UnsupportedImageFormat);
                }
                Ok(InputImage::new(sniff_mime_type(&bytes), bytes))
            }
        }
    }

    /// Resolve every source in order, stopping at the first failure.
    pub async fn resolve_all(&self, inputs: &[String]) -> Result<Vec<InputImage>> {
        let mut images = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let image = self.resolve(input).await.map_err(|e| {
                log::warn!("Image #{} could not be resolved: {}", index, e);
                e
            })?;
            images.push(image);
        }
        Ok(images)
    }

    async fn fetch(&self, url: &str) -> Result<InputImage> {
        log::debug!("Fetching input image from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageGenError::FetchError(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenError::FetchError(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| v.starts_with("image/"));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageGenError::FetchError(format!("{}: {}", url, e)))?
            .to_vec();

        let mime_type = declared.unwrap_or_else(|| sniff_mime_type(&bytes).to_string());
        Ok(InputImage::new(mime_type, bytes))
    }
}
