use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbImage;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("Image data is empty")]
    EmptyData,
    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Failed to decode image: {0}")]
    DecodeFailed(#[from] image::ImageError),
}

/// Strips a `data:<mime>;base64,` prefix, if any.
fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    }
}

pub fn try_decode_image_payload(payload: &str) -> Result<RgbImage, ImageDecodeError> {
    let encoded: String = strip_data_url(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if encoded.is_empty() {
        return Err(ImageDecodeError::EmptyData);
    }

    let bytes = STANDARD.decode(encoded.as_bytes())?;
    if bytes.is_empty() {
        return Err(ImageDecodeError::EmptyData);
    }

    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgb8())
}

/// Decodes a base64 (optionally data-URL) image into RGB pixels.
///
/// Returns `None` on any failure; callers report it as bad client input.
pub fn decode_image_payload(payload: &str) -> Option<RgbImage> {
    try_decode_image_payload(payload)
        .map_err(|e| warn!("Error converting base64 to image: {}", e))
        .ok()
}
