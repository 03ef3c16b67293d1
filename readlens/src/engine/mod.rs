//! OCR engine layer.
//!
//! The rest of the service treats recognition as a black box with a single
//! contract: `readtext(image bytes) -> Vec<RawDetection>`. This module
//! provides that contract on top of Tesseract (via `leptess`) and owns the
//! process-lifetime cache of engines keyed by language set.

mod registry;
mod tesseract;

pub use registry::EngineRegistry;
pub use tesseract::TesseractEngine;
