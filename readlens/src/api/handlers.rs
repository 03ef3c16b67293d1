//! HTTP handlers for the OCR endpoints.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::{debug, info};

use crate::api::dto::{
    HealthResponse, LegacyOcrRequest, LegacyOcrResponse, OcrRequest, OcrResponse,
};
use crate::api::state::AppState;
use crate::detection::{self, OcrSummary};
use crate::error::{ErrorBody, ReadlensError, Result};
use crate::imaging;

/// Languages and threshold the legacy `/ocr` endpoint is pinned to.
const LEGACY_LANGUAGES: [&str; 2] = ["en", "de"];
const LEGACY_MIN_CONFIDENCE: f32 = 0.4;

/// Decode, recognize, and summarize one image. Returns the summary plus the
/// wall-clock seconds spent around the OCR call.
async fn process_image(
    state: &AppState,
    image: &str,
    languages: &[String],
    min_confidence: f32,
) -> Result<(OcrSummary, f64)> {
    if image.trim().is_empty() {
        return Err(ReadlensError::Validation("Missing image data".to_string()));
    }
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(ReadlensError::Validation(format!(
            "min_confidence must be within [0, 1], got {min_confidence}"
        )));
    }
    if languages.is_empty() {
        return Err(ReadlensError::Validation(
            "languages must not be empty".to_string(),
        ));
    }

    let image_bytes = imaging::decode_base64_image(image, &state.config.ocr)?;

    let started = Instant::now();
    let engine = state.engines.get_or_init(languages).await?;
    let detections = engine.readtext(&image_bytes).await?;
    let elapsed = started.elapsed().as_secs_f64();

    debug!(
        detections = detections.len(),
        elapsed, "OCR call finished"
    );

    Ok((detection::summarize(detections, min_confidence), elapsed))
}

/// `POST /` — root endpoint kept for backward compatibility.
#[utoipa::path(
    post,
    path = "/",
    tag = "ocr",
    request_body = OcrRequest,
    responses(
        (status = 200, description = "Extracted text and boxes", body = OcrResponse),
        (status = 400, description = "Missing or invalid image data", body = ErrorBody),
        (status = 500, description = "OCR processing error", body = ErrorBody),
    )
)]
pub async fn ocr_root(
    State(state): State<AppState>,
    Json(req): Json<OcrRequest>,
) -> Result<Json<OcrResponse>> {
    let (summary, elapsed) =
        process_image(&state, &req.image, &req.languages, req.min_confidence).await?;
    Ok(Json(OcrResponse::from_summary(summary, elapsed)))
}

/// `POST /api/ocr`
#[utoipa::path(
    post,
    path = "/api/ocr",
    tag = "ocr",
    request_body = OcrRequest,
    responses(
        (status = 200, description = "Extracted text and boxes", body = OcrResponse),
        (status = 400, description = "Missing or invalid image data", body = ErrorBody),
        (status = 500, description = "OCR processing error", body = ErrorBody),
    )
)]
pub async fn ocr(
    State(state): State<AppState>,
    Json(req): Json<OcrRequest>,
) -> Result<Json<OcrResponse>> {
    let (summary, elapsed) =
        process_image(&state, &req.image, &req.languages, req.min_confidence).await?;
    Ok(Json(OcrResponse::from_summary(summary, elapsed)))
}

/// `POST /ocr` — legacy endpoint with fixed languages and threshold.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    request_body = LegacyOcrRequest,
    responses(
        (status = 200, description = "Extracted text and boxes", body = LegacyOcrResponse),
        (status = 400, description = "Missing or invalid image data", body = ErrorBody),
        (status = 500, description = "OCR processing error", body = ErrorBody),
    )
)]
pub async fn ocr_legacy(
    State(state): State<AppState>,
    Json(req): Json<LegacyOcrRequest>,
) -> Result<Json<LegacyOcrResponse>> {
    if req.base64_image.trim().is_empty() {
        return Err(ReadlensError::Validation(
            "Missing base64Image field".to_string(),
        ));
    }

    let languages: Vec<String> = LEGACY_LANGUAGES.iter().map(|l| l.to_string()).collect();
    let (summary, _) = process_image(
        &state,
        &req.base64_image,
        &languages,
        LEGACY_MIN_CONFIDENCE,
    )
    .await?;

    info!(text = %summary.text, "legacy OCR request complete");
    Ok(Json(LegacyOcrResponse::from(summary)))
}

/// `OPTIONS /ocr` — CORS preflight, empty body.
pub async fn preflight_ocr() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

/// `GET /health`
///
/// Always succeeds; never touches the engine registry.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
