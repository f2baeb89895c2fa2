//! The single entry point shared by every front end.
//!
//! [`compress_image`] validates the input, decodes it once, runs the size
//! search against the decoded original, and packages the final attempt. It
//! has no transport dependencies, so every front end calls it the
//! same way and maps [`CompressError`] onto its own error surface.

use thiserror::Error;

use crate::budget::{BudgetError, TargetBudget};
use crate::config::{ConfigError, SearchConfig};
use crate::decode::{decode_image, read_dimensions, DecodeError};
use crate::report::{
    bytes_to_rounded_kb, compression_ratio, to_data_uri, CompressionReport, Dimensions,
};
use crate::search::{encode_to_budget, CodecError, JpegAttemptEncoder};

/// Everything that can stop a compression request.
#[derive(Debug, Error)]
pub enum CompressError {
    /// Target size absent, zero, negative, or unparseable.
    #[error("invalid target size: {0}")]
    InvalidBudget(#[from] BudgetError),

    /// Empty image payload.
    #[error("no image data provided")]
    MissingInput,

    /// Payload larger than the configured limit.
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    /// Payload is not in any recognized image format.
    #[error("input is not a supported image format")]
    UnsupportedFormat,

    /// Search parameters that would not terminate or cannot be encoded.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The source image could not be decoded.
    #[error("decode failed: {0}")]
    Decode(DecodeError),

    /// A resize or encode failed mid-search.
    #[error("codec failed: {0}")]
    Codec(#[from] CodecError),
}

impl From<DecodeError> for CompressError {
    fn from(error: DecodeError) -> Self {
        match error {
            DecodeError::UnsupportedFormat => CompressError::UnsupportedFormat,
            other => CompressError::Decode(other),
        }
    }
}

impl CompressError {
    /// Whether the request itself was at fault, as opposed to the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CompressError::InvalidBudget(_)
                | CompressError::MissingInput
                | CompressError::InputTooLarge { .. }
                | CompressError::UnsupportedFormat
        )
    }

    /// Message safe to show the caller. Server-side failures are opaque.
    pub fn public_message(&self) -> &'static str {
        match self {
            CompressError::InvalidBudget(_) => "Invalid target size",
            CompressError::MissingInput => "No image file provided",
            CompressError::InputTooLarge { .. } => "File too large",
            CompressError::UnsupportedFormat => "Only image files are allowed",
            CompressError::InvalidConfig(_)
            | CompressError::Decode(_)
            | CompressError::Codec(_) => "Failed to compress image",
        }
    }
}

/// The final encoding and what it took to get there.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Encoded JPEG bytes of the last attempt.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub original_len: usize,
    pub original_width: u32,
    pub original_height: u32,
    pub attempts: u32,
    pub within_budget: bool,
}

impl CompressionResult {
    pub fn compressed_len(&self) -> usize {
        self.jpeg.len()
    }

    /// Whole-percent size reduction; negative when the output is larger.
    pub fn compression_ratio(&self) -> i64 {
        compression_ratio(self.original_len, self.jpeg.len())
    }

    /// Build the transport report, embedding the JPEG as a data URI.
    pub fn to_report(&self) -> CompressionReport {
        CompressionReport {
            success: true,
            original_size: bytes_to_rounded_kb(self.original_len),
            compressed_size: bytes_to_rounded_kb(self.jpeg.len()),
            compression_ratio: self.compression_ratio(),
            original_dimensions: Dimensions {
                width: self.original_width,
                height: self.original_height,
            },
            compressed_dimensions: Dimensions {
                width: self.width,
                height: self.height,
            },
            quality: self.quality,
            within_budget: self.within_budget,
            compressed_image: to_data_uri(&self.jpeg),
        }
    }
}

/// Re-encode `input` as a JPEG no larger than `budget`, best effort.
///
/// Input checks run before any decoding. The original dimensions come from
/// the image header. A result is returned even when the budget cannot be
/// met; see [`CompressionResult::within_budget`].
pub fn compress_image(
    input: &[u8],
    budget: TargetBudget,
    config: &SearchConfig,
) -> Result<CompressionResult, CompressError> {
    config.validate()?;

    if input.is_empty() {
        return Err(CompressError::MissingInput);
    }
    if input.len() > config.max_input_bytes {
        return Err(CompressError::InputTooLarge {
            size: input.len(),
            limit: config.max_input_bytes,
        });
    }

    let (original_width, original_height) = read_dimensions(input)?;
    let source = decode_image(input)?;
    let encoder = JpegAttemptEncoder::new(config.resize_filter);
    let outcome = encode_to_budget(&source, budget, config, &encoder)?;

    let state = outcome.attempt.state;
    log::info!(
        "compressed {}x{} ({} bytes) to {}x{} q={} ({} bytes, target {}) in {} attempts",
        original_width,
        original_height,
        input.len(),
        state.width,
        state.height,
        state.quality,
        outcome.attempt.bytes.len(),
        budget.bytes(),
        outcome.attempts
    );

    Ok(CompressionResult {
        jpeg: outcome.attempt.bytes,
        width: state.width,
        height: state.height,
        quality: state.quality,
        original_len: input.len(),
        original_width,
        original_height,
        attempts: outcome.attempts,
        within_budget: outcome.within_budget,
    })
}

/// [`compress_image`] with the target given in kilobytes, validated first.
pub fn compress_image_kb(
    input: &[u8],
    target_kb: i64,
    config: &SearchConfig,
) -> Result<CompressionResult, CompressError> {
    let budget = TargetBudget::from_kilobytes(target_kb)?;
    compress_image(input, budget, config)
}
