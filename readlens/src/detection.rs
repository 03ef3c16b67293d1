//! Detection post-processing: confidence filtering, bounding-box math, and
//! text aggregation over the raw detections the OCR engine produces.

/// A single raw detection from the OCR engine: a four-corner pixel-space
/// polygon, the recognized text, and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub polygon: [[f32; 2]; 4],
    pub text: String,
    pub confidence: f32,
}

/// Axis-aligned bounding box in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Smallest axis-aligned box covering all corner points.
    pub fn from_polygon(points: &[[f32; 2]]) -> Self {
        if points.is_empty() {
            return Self {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
        }

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for point in points {
            min_x = min_x.min(point[0]);
            min_y = min_y.min(point[1]);
            max_x = max_x.max(point[0]);
            max_y = max_y.max(point[1]);
        }

        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}

/// A detection kept after confidence filtering, with its box resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub bounds: BoundingBox,
    pub text: String,
    pub confidence: f32,
}

/// Aggregate result over the kept detections of one OCR call.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrSummary {
    /// Kept texts joined with single spaces, in detection order.
    pub text: String,
    /// Arithmetic mean of kept confidences; 0.0 when nothing was kept.
    pub confidence: f32,
    pub boxes: Vec<TextBox>,
}

/// Discard detections below `min_confidence` and shape the remainder.
pub fn summarize(detections: Vec<RawDetection>, min_confidence: f32) -> OcrSummary {
    let mut texts = Vec::new();
    let mut boxes = Vec::new();
    let mut total_confidence = 0.0f32;

    for detection in detections {
        if detection.confidence < min_confidence {
            continue;
        }

        texts.push(detection.text.clone());
        total_confidence += detection.confidence;
        boxes.push(TextBox {
            bounds: BoundingBox::from_polygon(&detection.polygon),
            text: detection.text,
            confidence: detection.confidence,
        });
    }

    let confidence = if boxes.is_empty() {
        0.0
    } else {
        total_confidence / boxes.len() as f32
    };

    OcrSummary {
        text: texts.join(" "),
        confidence,
        boxes,
    }
}
