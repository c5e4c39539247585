use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gemini_image::{
    models::{ErrorBody, GenerateContentResponse},
    server::{json_config, routes, AppState},
    ImageGenError, ImageGenerator, ImageResponse, InputImage, Result,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Canned backend that records what it was asked for.
struct FakeGenerator {
    reply: Option<Value>,
    calls: Mutex<Vec<(String, Vec<InputImage>)>>,
}

impl FakeGenerator {
    fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    fn model_id(&self) -> &str {
        "test-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        images: &[InputImage],
    ) -> Result<GenerateContentResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), images.to_vec()));

        match &self.reply {
            Some(reply) => Ok(serde_json::from_value(reply.clone())?),
            None => Err(ImageGenError::UpstreamError {
                status: 503,
                message: "model overloaded".into(),
            }),
        }
    }
}

fn png_reply() -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is a red circle."},
                    {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(PNG_MAGIC)}}
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

fn refusal_reply() -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": "I can't help with that request."}]},
            "finishReason": "STOP"
        }]
    })
}

macro_rules! app {
    ($generator:expr) => {{
        let state = AppState::new($generator.clone()).unwrap();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(json_config(1024 * 1024))
                .configure(routes),
        )
        .await
    }};
}

#[actix_web::test]
async fn healthz_reports_model_without_calling_upstream() {
    let generator = FakeGenerator::failing();
    let app = app!(generator);

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "ok", "modelId": "test-model"}));
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn generate_returns_png_as_base64() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({"prompt": "a red circle on white background"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ImageResponse = test::read_body_json(resp).await;
    assert_eq!(body.model_id, "test-model");
    assert_eq!(body.mime_type, "image/png");
    let bytes = STANDARD.decode(&body.image_base64).unwrap();
    assert!(bytes.starts_with(&PNG_MAGIC));

    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls[0].0, "a red circle on white background");
    assert!(calls[0].1.is_empty());
}

#[actix_web::test]
async fn generate_text_only_reply_is_422() {
    let generator = FakeGenerator::replying(refusal_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({"prompt": "something disallowed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.contains("No image returned"));
}

#[actix_web::test]
async fn generate_upstream_failure_is_500_with_detail() {
    let generator = FakeGenerator::failing();
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({"prompt": "a cat"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Generation failed:"));
    assert!(body.detail.contains("model overloaded"));
}

#[actix_web::test]
async fn generate_rejects_empty_prompt() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/generate")
        .set_json(json!({"prompt": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn malformed_body_is_400_with_detail() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/generate")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"prompt\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Invalid request body"));
}

#[actix_web::test]
async fn edit_rejects_empty_image_list_before_any_call() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({"prompt": "make it blue", "images": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.contains("images"));
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn edit_missing_images_field_is_400() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({"prompt": "make it blue"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn edit_forwards_decoded_images_in_order() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let jpeg: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({
            "prompt": "put the cat on the couch",
            "images": [
                format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC)),
                STANDARD.encode(jpeg),
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let calls = generator.calls.lock().unwrap();
    let images = &calls[0].1;
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], InputImage::new("image/png", PNG_MAGIC.to_vec()));
    assert_eq!(images[1], InputImage::new("image/jpeg", jpeg.to_vec()));
}

#[actix_web::test]
async fn edit_unsupported_source_is_400() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({"prompt": "make it blue", "images": ["definitely not an image"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(
        body.detail,
        "Unsupported image format. Provide a data URL, URL, or base64 string."
    );
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn edit_url_not_found_is_500() {
    let image_host = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&image_host)
        .await;

    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({
            "prompt": "make it blue",
            "images": [format!("{}/missing.png", image_host.uri())]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Edit failed:"));
    assert!(body.detail.contains("404"));
    assert_eq!(generator.call_count(), 0);
}

#[actix_web::test]
async fn edit_unreachable_url_is_500() {
    let generator = FakeGenerator::replying(png_reply());
    let app = app!(generator);

    let req = test::TestRequest::post()
        .uri("/edit")
        .set_json(json!({
            "prompt": "make it blue",
            "images": ["http://127.0.0.1:1/cat.png"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Edit failed:"));
    assert_eq!(generator.call_count(), 0);
}
