pub mod cors;
pub mod error;
pub mod handlers;

use crate::{
    config::ServerConfig,
    error::Result,
    gemini::ImageGenerator,
    models::ErrorBody,
    sources::ImageSourceResolver,
};
use actix_web::{error::InternalError, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;

pub use error::ApiError;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub resolver: ImageSourceResolver,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Result<Self> {
        Ok(Self {
            generator,
            resolver: ImageSourceResolver::new()?,
        })
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(handlers::healthz))
        .route("/generate", web::post().to(handlers::generate))
        .route("/edit", web::post().to(handlers::edit));
}

/// JSON extractor settings: large bodies for inline images, and a `{detail}`
/// body instead of actix's plain-text error on malformed input.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let detail = format!("Invalid request body: {}", err);
            log::debug!("{}", detail);
            InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody { detail }))
                .into()
        })
}

pub async fn run(config: ServerConfig, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    let json_limit = config.json_limit;
    let origins = config.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config(json_limit))
            .wrap(cors::cors(&origins))
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .configure(routes)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
