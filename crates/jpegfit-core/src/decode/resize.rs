//! Resizing of the decoded source for resolution-reduced encoding attempts.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// Both dimensions are set independently, so callers that want to keep the
/// aspect ratio must compute them with [`scale_dimensions`].
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the source pixel buffer does not match its
/// declared size.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image.as_rgb_view().ok_or_else(|| {
        DecodeError::CorruptedFile("Pixel buffer does not match image dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Scale both dimensions by the same factor, rounding down to whole pixels.
///
/// Neither dimension drops below 1 so the result is always encodable.
pub fn scale_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let scale = |v: u32| ((v as f64 * factor).floor() as u32).max(1);
    (scale(width), scale(height))
}
