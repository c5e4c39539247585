use gemini_image::{
    logger,
    server::{self, AppState},
    GeminiClient, GeminiConfig, ServerConfig,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init()?;

    if !dotenv_loaded {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let gemini_config = GeminiConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        e
    })?;
    let server_config = ServerConfig::from_env()?;

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &server_config,
    );
    logger::log_config_info(&gemini_config);

    let client = GeminiClient::new(gemini_config)?;
    let state = AppState::new(Arc::new(client))?;

    server::run(server_config, state).await?;
    Ok(())
}
