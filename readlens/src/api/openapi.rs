use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::error;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Readlens OCR API",
        version = "1.0.0",
        description = "A REST API that processes base64-encoded images and extracts text using Tesseract OCR.",
    ),
    paths(
        handlers::ocr_root,
        handlers::ocr,
        handlers::ocr_legacy,
        handlers::health_check,
    ),
    components(schemas(
        dto::OcrRequest,
        dto::OcrResponse,
        dto::DetectedBox,
        dto::LegacyOcrRequest,
        dto::LegacyOcrResponse,
        dto::LegacyDetectedBox,
        dto::BoxGeometry,
        dto::HealthResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "ocr", description = "Text extraction from base64-encoded images"),
        (name = "health", description = "Health check"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
