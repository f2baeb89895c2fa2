//! Decoding of arbitrary raster input into RGB pixels.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, DecodedImage};

/// Decode image bytes of any supported raster format into RGB8 pixels.
///
/// The format is sniffed from the content, not from a filename or MIME type.
/// Alpha is discarded because the output of the pipeline is always JPEG.
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if no known format signature
/// matches, and `DecodeError::CorruptedFile` if the data fails to decode.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = guessed_reader(bytes)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let decoded = DecodedImage::from_rgb_image(img.into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: decoded.width,
            height: decoded.height,
        });
    }

    log::debug!(
        "decoded {} input bytes into {}x{} image",
        bytes.len(),
        decoded.width,
        decoded.height
    );

    Ok(decoded)
}

/// Read the image dimensions from the header without decoding pixel data.
pub fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    guessed_reader(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::UnsupportedFormat);
    }

    Ok(reader)
}
