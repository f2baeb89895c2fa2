//! Tuning parameters for the size search.
//!
//! The defaults reproduce the behavior the service has always shipped with:
//! start at quality 80, step down by 5 to a floor of 10, then shrink by 0.9
//! until the width reaches 100 pixels. They are starting points, not
//! validated optima.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::MAX_JPEG_QUALITY;

/// Quality of the first attempt.
pub const DEFAULT_INITIAL_QUALITY: u8 = 80;
/// Amount subtracted from the quality on each phase-one step.
pub const DEFAULT_QUALITY_STEP: u8 = 5;
/// Phase one never goes below this quality.
pub const DEFAULT_MIN_QUALITY: u8 = 10;
/// Factor applied to both dimensions on each phase-two step.
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.9;
/// Phase two stops once the width is at or below this many pixels.
pub const DEFAULT_MIN_WIDTH: u32 = 100;
/// Largest accepted input payload (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Invalid combinations of search parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("quality {0} is out of range (1-100)")]
    QualityOutOfRange(u8),

    #[error("min_quality ({min}) must not exceed initial_quality ({initial})")]
    QualityFloorAboveStart { min: u8, initial: u8 },

    #[error("quality_step must be at least 1")]
    ZeroQualityStep,

    #[error("shrink_factor must be strictly between 0 and 1, got {0}")]
    ShrinkFactorOutOfRange(f64),

    #[error("min_width must be at least 1")]
    ZeroMinWidth,

    #[error("max_input_bytes must be at least 1")]
    ZeroInputLimit,
}

/// Parameters of the two-phase quality/resolution search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub initial_quality: u8,
    pub quality_step: u8,
    pub min_quality: u8,
    pub shrink_factor: f64,
    pub min_width: u32,
    /// Interpolation used when re-deriving a smaller image from the source.
    pub resize_filter: FilterType,
    /// Payloads above this size are refused before decoding.
    pub max_input_bytes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            initial_quality: DEFAULT_INITIAL_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            min_quality: DEFAULT_MIN_QUALITY,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            min_width: DEFAULT_MIN_WIDTH,
            resize_filter: FilterType::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl SearchConfig {
    /// Check that the parameters describe a terminating, encodable search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for quality in [self.initial_quality, self.min_quality] {
            if quality == 0 || quality > MAX_JPEG_QUALITY {
                return Err(ConfigError::QualityOutOfRange(quality));
            }
        }
        if self.min_quality > self.initial_quality {
            return Err(ConfigError::QualityFloorAboveStart {
                min: self.min_quality,
                initial: self.initial_quality,
            });
        }
        if self.quality_step == 0 {
            return Err(ConfigError::ZeroQualityStep);
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(ConfigError::ShrinkFactorOutOfRange(self.shrink_factor));
        }
        if self.min_width == 0 {
            return Err(ConfigError::ZeroMinWidth);
        }
        if self.max_input_bytes == 0 {
            return Err(ConfigError::ZeroInputLimit);
        }
        Ok(())
    }
}
