//! Bounded two-phase search for an encoding that fits a byte budget.
//!
//! Phase one lowers the JPEG quality at the original resolution. If the
//! quality floor is reached while still over budget, phase two keeps that
//! quality and shrinks both dimensions by a constant factor until the budget
//! is met or the width floor is reached.
//!
//! The search state is a plain value ([`SearchState`]) and the transition
//! between states is the pure function [`SearchState::next`], so the state
//! machine can be tested without encoding anything. Every attempt re-derives
//! its buffer from the original decoded image.

use thiserror::Error;

use crate::budget::TargetBudget;
use crate::config::SearchConfig;
use crate::decode::{resize, scale_dimensions, DecodeError, DecodedImage, FilterType};
use crate::encode::{encode_jpeg, EncodeError};

/// A failure of the resize or encode primitive during the search.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("resize failed: {0}")]
    Resize(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Produces one encoded buffer from the original image at given parameters.
pub trait AttemptEncoder {
    fn encode(
        &self,
        source: &DecodedImage,
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError>;
}

/// The production encoder: resize the source if needed, then encode JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegAttemptEncoder {
    pub filter: FilterType,
}

impl JpegAttemptEncoder {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl AttemptEncoder for JpegAttemptEncoder {
    fn encode(
        &self,
        source: &DecodedImage,
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        if source.dimensions() == (width, height) {
            return Ok(encode_jpeg(source, quality)?);
        }
        let resized = resize(source, width, height, self.filter)?;
        Ok(encode_jpeg(&resized, quality)?)
    }
}

/// Which phase of the search produced a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    /// Lowering quality at the original resolution.
    Quality,
    /// Shrinking the resolution at a fixed quality.
    Resolution,
}

/// Parameters of the next attempt to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub phase: SearchPhase,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
}

impl SearchState {
    /// The first attempt: initial quality at the source's own dimensions.
    pub fn initial(config: &SearchConfig, width: u32, height: u32) -> Self {
        Self {
            phase: SearchPhase::Quality,
            quality: config.initial_quality,
            width,
            height,
        }
    }

    /// Decide the next attempt given the size this state's attempt produced.
    ///
    /// Returns `None` once the budget is met or both floors are exhausted.
    /// Quality and dimensions never increase from one state to the next.
    pub fn next(
        self,
        encoded_len: usize,
        budget: TargetBudget,
        config: &SearchConfig,
    ) -> Option<Self> {
        if budget.fits(encoded_len) {
            return None;
        }

        if self.phase == SearchPhase::Quality && self.quality > config.min_quality {
            let quality = self
                .quality
                .saturating_sub(config.quality_step)
                .max(config.min_quality);
            if quality < self.quality {
                return Some(Self { quality, ..self });
            }
        }

        self.shrink(config)
    }

    fn shrink(self, config: &SearchConfig) -> Option<Self> {
        if self.width <= config.min_width {
            return None;
        }

        let (width, height) = scale_dimensions(self.width, self.height, config.shrink_factor);
        if width >= self.width {
            return None;
        }

        Some(Self {
            phase: SearchPhase::Resolution,
            width,
            height,
            ..self
        })
    }
}

/// One encoding trial and its output.
#[derive(Debug, Clone)]
pub struct EncodingAttempt {
    pub state: SearchState,
    pub bytes: Vec<u8>,
}

/// The final attempt of a search plus bookkeeping.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub attempt: EncodingAttempt,
    /// Number of encodes performed, including the first.
    pub attempts: u32,
    pub within_budget: bool,
}

/// Run the bounded search against `budget`.
///
/// Always returns the last attempt, even when it is still over budget; check
/// [`SearchOutcome::within_budget`]. Codec errors abort the search at once.
pub fn encode_to_budget<E: AttemptEncoder>(
    source: &DecodedImage,
    budget: TargetBudget,
    config: &SearchConfig,
    encoder: &E,
) -> Result<SearchOutcome, CodecError> {
    let mut state = SearchState::initial(config, source.width, source.height);
    let mut attempts = 0u32;

    loop {
        let bytes = encoder.encode(source, state.width, state.height, state.quality)?;
        attempts += 1;

        log::debug!(
            "attempt {}: {:?} q={} {}x{} -> {} bytes (budget {})",
            attempts,
            state.phase,
            state.quality,
            state.width,
            state.height,
            bytes.len(),
            budget.bytes()
        );

        match state.next(bytes.len(), budget, config) {
            Some(next) => state = next,
            None => {
                let within_budget = budget.fits(bytes.len());
                if !within_budget {
                    log::warn!(
                        "budget of {} bytes unreachable; returning {} bytes at q={} {}x{}",
                        budget.bytes(),
                        bytes.len(),
                        state.quality,
                        state.width,
                        state.height
                    );
                }
                return Ok(SearchOutcome {
                    attempt: EncodingAttempt { state, bytes },
                    attempts,
                    within_budget,
                });
            }
        }
    }
}

/// Upper bound on the number of encodes a search can make for a source of
/// the given dimensions.
pub fn max_attempts(config: &SearchConfig, width: u32, height: u32) -> u32 {
    let mut quality = config.initial_quality;
    let mut count = 1;
    while quality > config.min_quality {
        let lowered = quality
            .saturating_sub(config.quality_step)
            .max(config.min_quality);
        if lowered >= quality {
            break;
        }
        quality = lowered;
        count += 1;
    }

    let (mut w, mut h) = (width, height);
    while w > config.min_width {
        let (nw, nh) = scale_dimensions(w, h, config.shrink_factor);
        if nw >= w {
            break;
        }
        (w, h) = (nw, nh);
        count += 1;
    }
    count
}
