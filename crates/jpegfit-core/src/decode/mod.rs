//! Image decoding and resizing for jpegfit.
//!
//! This module provides functionality for:
//! - Decoding any supported raster format (JPEG, PNG, GIF, WebP, BMP, TIFF) to RGB
//! - Reading dimensions from the image header
//! - Resizing the decoded source to exact dimensions
//!
//! All operations are synchronous and leave the source image untouched, so
//! the size search can derive every attempt from the same original.

mod raster;
mod resize;
mod types;

pub use raster::{decode_image, read_dimensions};
pub use resize::{resize, scale_dimensions};
pub use types::{DecodeError, DecodedImage, FilterType};
