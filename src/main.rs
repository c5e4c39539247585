use gemini_image::{
    gemini::{collect_text, extract_image},
    logger, models, GeminiClient, GeminiConfig, GeneratedImage, ImageGenError, ImageGenerator,
};
use image::ImageFormat;
use std::{env, fs, path::Path, process::ExitCode};

const DEFAULT_PROMPT: &str =
    "create a photorealistic image of an orange cat with green eyes sitting on a couch";
const OUTPUT_PATH: &str = "cat.png";

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    if let Err(e) = logger::init() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> gemini_image::Result<()> {
    let config = GeminiConfig::from_env()?;
    logger::log_config_info(&config);

    if !models::is_known_image_model(&config.model_id) {
        log::warn!(
            "Model '{}' is not a known image model; known models are:",
            config.model_id
        );
        for model in models::known_image_models() {
            log::warn!("  {} - {}", model.id, model.name);
        }
    }

    let client = GeminiClient::new(config)?;
    let prompt = env::args()
        .nth(1)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    log::info!("🎨 Using model: {}", client.model_id());
    log::info!("📝 Prompt: {}", prompt);

    let response = {
        let _timer = logger::timer("generateContent");
        client.generate(&prompt, &[]).await?
    };

    match extract_image(&response) {
        Ok(image) => {
            save_png(Path::new(OUTPUT_PATH), &image)?;
            log::info!(
                "💾 Image saved as {} ({} bytes of {} from the model)",
                OUTPUT_PATH,
                image.bytes.len(),
                image.mime_type
            );
            Ok(())
        }
        Err(e @ ImageGenError::NoImage(_)) => {
            if collect_text(&response).is_empty() {
                log::warn!("Model returned no text either");
            }
            log::warn!("No image bytes found in response. Full response follows:");
            log::warn!("{:#?}", response);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Write `image` to `path` as PNG, re-encoding when the model sent another
/// format.
fn save_png(path: &Path, image: &GeneratedImage) -> gemini_image::Result<()> {
    if image.mime_type.eq_ignore_ascii_case("image/png") {
        fs::write(path, &image.bytes)?;
        return Ok(());
    }

    log::info!("🔄 Converting {} to PNG", image.mime_type);
    image::load_from_memory(&image.bytes)
        .and_then(|decoded| decoded.save_with_format(path, ImageFormat::Png))
        .map_err(|e| {
            ImageGenError::SerializationError(format!(
                "Could not convert {} output to PNG: {}",
                image.mime_type, e
            ))
        })
}
