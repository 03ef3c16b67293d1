//! Request/response wire types for the OCR endpoints.

use serde::{Deserialize, Serialize};

use crate::detection::{OcrSummary, TextBox};

fn default_languages() -> Vec<String> {
    vec!["en".to_string(), "de".to_string()]
}

fn default_min_confidence() -> f32 {
    0.4
}

/// Request body for `POST /` and `POST /api/ocr`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct OcrRequest {
    /// Base64-encoded image, with or without a data-URL prefix.
    #[serde(default)]
    pub image: String,
    /// Language codes to recognize (ISO 639-1 or Tesseract codes).
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Minimum confidence threshold for kept detections, in [0, 1].
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

/// One kept detection with its axis-aligned box.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DetectedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub confidence: f32,
}

impl From<TextBox> for DetectedBox {
    fn from(text_box: TextBox) -> Self {
        Self {
            x: text_box.bounds.x,
            y: text_box.bounds.y,
            width: text_box.bounds.width,
            height: text_box.bounds.height,
            text: text_box.text,
            confidence: text_box.confidence,
        }
    }
}

/// Response body for `POST /` and `POST /api/ocr`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrResponse {
    /// Kept texts joined with single spaces.
    pub text: String,
    /// Mean confidence over kept detections; 0.0 when nothing was kept.
    pub confidence: f32,
    pub boxes: Vec<DetectedBox>,
    /// Wall-clock seconds spent in the OCR call.
    pub processing_time: f64,
}

impl OcrResponse {
    pub fn from_summary(summary: OcrSummary, processing_time: f64) -> Self {
        Self {
            text: summary.text,
            confidence: summary.confidence,
            boxes: summary.boxes.into_iter().map(Into::into).collect(),
            processing_time,
        }
    }
}

/// Request body for the legacy `POST /ocr` endpoint.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LegacyOcrRequest {
    #[serde(default, rename = "base64Image")]
    pub base64_image: String,
}

/// Box geometry nested inside a legacy detection.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BoxGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Legacy detection shape: geometry nested under a `box` key.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LegacyDetectedBox {
    pub text: String,
    pub confidence: f32,
    #[serde(rename = "box")]
    pub geometry: BoxGeometry,
}

impl From<TextBox> for LegacyDetectedBox {
    fn from(text_box: TextBox) -> Self {
        Self {
            text: text_box.text,
            confidence: text_box.confidence,
            geometry: BoxGeometry {
                x: text_box.bounds.x,
                y: text_box.bounds.y,
                width: text_box.bounds.width,
                height: text_box.bounds.height,
            },
        }
    }
}

/// Response body for the legacy `POST /ocr` endpoint. No timing field.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct LegacyOcrResponse {
    pub text: String,
    pub confidence: f32,
    pub boxes: Vec<LegacyDetectedBox>,
}

impl From<OcrSummary> for LegacyOcrResponse {
    fn from(summary: OcrSummary) -> Self {
        Self {
            text: summary.text,
            confidence: summary.confidence,
            boxes: summary.boxes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_defaults_apply() {
        let req: OcrRequest = serde_json::from_str(r#"{"image":"abc"}"#).unwrap();
        assert_eq!(req.image, "abc");
        assert_eq!(req.languages, vec!["en", "de"]);
        assert_eq!(req.min_confidence, 0.4);
    }

    #[test]
    fn missing_image_defaults_to_empty() {
        let req: OcrRequest = serde_json::from_str("{}").unwrap();
        assert!(req.image.is_empty());
    }

    #[test]
    fn legacy_request_uses_camel_case_field() {
        let req: LegacyOcrRequest =
            serde_json::from_str(r#"{"base64Image":"abc"}"#).unwrap();
        assert_eq!(req.base64_image, "abc");

        let req: LegacyOcrRequest = serde_json::from_str("{}").unwrap();
        assert!(req.base64_image.is_empty());
    }

    fn sample_summary() -> OcrSummary {
        OcrSummary {
            text: "Hello world".to_string(),
            confidence: 0.9,
            boxes: vec![TextBox {
                bounds: BoundingBox {
                    x: 10.0,
                    y: 20.0,
                    width: 30.0,
                    height: 40.0,
                },
                text: "Hello world".to_string(),
                confidence: 0.9,
            }],
        }
    }

    #[test]
    fn response_serializes_flat_boxes() {
        let resp = OcrResponse::from_summary(sample_summary(), 0.25);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["text"], "Hello world");
        assert_eq!(json["processing_time"], 0.25);
        assert_eq!(json["boxes"][0]["x"], 10.0);
        assert_eq!(json["boxes"][0]["width"], 30.0);
        assert_eq!(json["boxes"][0]["text"], "Hello world");
    }

    #[test]
    fn legacy_response_nests_geometry_under_box() {
        let resp = LegacyOcrResponse::from(sample_summary());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["boxes"][0]["box"]["x"], 10.0);
        assert_eq!(json["boxes"][0]["box"]["height"], 40.0);
        assert_eq!(json["boxes"][0]["text"], "Hello world");
        assert!(json.get("processing_time").is_none());
    }
}
