use crate::{error::ImageGenError, models::ErrorBody};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// An [`ImageGenError`] on its way out of a route, tagged with the operation
/// that failed so 5xx details read "Generation failed: ...".
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(operation: &str, error: ImageGenError) -> Self {
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = if error.is_client_error() {
            error.to_string()
        } else {
            format!("{} failed: {}", operation, error)
        };
        Self { status, detail }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.detail)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            detail: self.detail.clone(),
        })
    }
}
