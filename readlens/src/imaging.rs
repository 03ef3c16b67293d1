//! Base64 decode and pixel-format normalization for incoming images.
//!
//! Everything that can go wrong in this stage is a client input error: the
//! caller sent data we cannot turn into pixels. The output is PNG-encoded
//! RGB8 bytes, the fixed format the OCR engine consumes.

use image::{GenericImageView, ImageFormat};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::config::OcrConfig;
use crate::error::{ReadlensError, Result};

/// Drop a data-URL header (`data:image/png;base64,`) if one is present.
/// Everything up to and including the first comma is discarded.
pub fn strip_data_url_prefix(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, rest)) => rest,
        None => data,
    }
}

/// Decode a base64 string into normalized, engine-ready image bytes.
///
/// The decoded image is converted to RGB8 regardless of its source format
/// and re-encoded as PNG. Dimensions are validated against the configured
/// bounds before any further processing.
pub fn decode_base64_image(data: &str, config: &OcrConfig) -> Result<Vec<u8>> {
    let payload = strip_data_url_prefix(data).trim();

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| ReadlensError::InvalidImage(format!("base64 decode failed: {e}")))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| ReadlensError::InvalidImage(format!("image decode failed: {e}")))?;

    let (width, height) = img.dimensions();
    let min = config.min_image_dimension;
    let max = config.max_image_dimension;
    if width < min || height < min {
        return Err(ReadlensError::InvalidImage(format!(
            "image too small: {width}x{height}, minimum {min}x{min}"
        )));
    }
    if width > max || height > max {
        return Err(ReadlensError::InvalidImage(format!(
            "image too large: {width}x{height}, maximum {max}x{max}"
        )));
    }

    let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
    let mut output = Vec::new();
    rgb.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| ReadlensError::Internal(format!("failed to encode image: {e}")))?;

    Ok(output)
}
