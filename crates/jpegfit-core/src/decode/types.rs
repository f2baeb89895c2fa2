//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding and resizing.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not start with the signature of any supported image format.
    #[error("Unrecognized image format")]
    UnsupportedFormat,

    /// The format was recognized but the data could not be decoded.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// A decode or resize produced (or was asked for) an empty image.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Interpolation used when a smaller attempt is derived from the source.
///
/// Serialized lowercase (`"nearest"`, `"bilinear"`, `"lanczos3"`) so it can
/// be set from JSON or JS config objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    /// Triangle filter; cheap and soft enough for JPEG at low quality.
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// A decoded source image with RGB pixel data.
///
/// This is the read-only original every encoding attempt is derived from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "RGB buffer does not match {}x{}",
            width,
            height
        );
        Self { width, height, pixels }
    }

    /// Take ownership of an `RgbImage`'s buffer without copying.
    pub fn from_rgb_image(rgb: image::RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        Self::new(width, height, rgb.into_raw())
    }

    /// Borrow the pixels as an image::ImageBuffer view without copying.
    pub fn as_rgb_view(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.pixels.as_slice())
    }

    /// Width and height as a tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True for a zero-area image or an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
