//! JPEG encoding of decoded images.
//!
//! Uses the `image` crate's baseline JPEG encoder. Output is always JPEG,
//! whatever format the source was decoded from.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Lowest quality accepted by the encoder; lower requests are clamped.
pub const MIN_JPEG_QUALITY: u8 = 1;
/// Highest quality accepted by the encoder; higher requests are clamped.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder rejected the image
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a decoded RGB image to JPEG bytes at the given quality (1-100).
///
/// Out-of-range quality values are clamped rather than rejected.
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let quality = quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY);

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&image.pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}
