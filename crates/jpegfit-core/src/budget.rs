//! Target output size handling.
//!
//! Callers express the target in kilobytes; the search works in bytes. The
//! conversion happens exactly once, in [`TargetBudget`], and a budget that
//! exists is always positive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per kilobyte used for every KB conversion in the crate.
pub const BYTES_PER_KB: u64 = 1024;

/// Largest accepted target, in kilobytes (4 TiB).
pub const MAX_TARGET_KB: i64 = 1 << 32;

/// Errors raised while validating a target size.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BudgetError {
    /// No target size was supplied and there is no default.
    #[error("Target size is missing")]
    Missing,

    /// The supplied text does not start with an integer.
    #[error("Target size is not a number: {0:?}")]
    NotANumber(String),

    /// Zero or negative target.
    #[error("Target size must be a positive number of kilobytes, got {0}")]
    NonPositive(i64),

    /// Target larger than [`MAX_TARGET_KB`].
    #[error("Target size of {0} KB is too large")]
    TooLarge(i64),
}

/// A validated, positive output size budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct TargetBudget {
    bytes: u64,
}

impl TargetBudget {
    /// Build a budget from a kilobyte count.
    pub fn from_kilobytes(kilobytes: i64) -> Result<Self, BudgetError> {
        if kilobytes <= 0 {
            return Err(BudgetError::NonPositive(kilobytes));
        }
        if kilobytes > MAX_TARGET_KB {
            return Err(BudgetError::TooLarge(kilobytes));
        }
        Ok(Self {
            bytes: kilobytes as u64 * BYTES_PER_KB,
        })
    }

    /// Build a budget from an exact byte count.
    pub fn from_bytes(bytes: u64) -> Result<Self, BudgetError> {
        if bytes == 0 {
            return Err(BudgetError::NonPositive(0));
        }
        Ok(Self { bytes })
    }

    /// The budget in bytes.
    pub fn bytes(self) -> u64 {
        self.bytes
    }

    /// The budget in whole kilobytes, rounded down.
    pub fn kilobytes(self) -> u64 {
        self.bytes / BYTES_PER_KB
    }

    /// Whether an encoded buffer of `len` bytes fits.
    pub fn fits(self, len: usize) -> bool {
        len as u64 <= self.bytes
    }
}

impl TryFrom<i64> for TargetBudget {
    type Error = BudgetError;

    /// Interprets the value as kilobytes, matching how the target travels on the wire.
    fn try_from(kilobytes: i64) -> Result<Self, Self::Error> {
        Self::from_kilobytes(kilobytes)
    }
}

impl From<TargetBudget> for u64 {
    fn from(budget: TargetBudget) -> Self {
        budget.kilobytes()
    }
}

/// Parse a target size form field into a budget.
///
/// The field is read the way upload forms submit it: leading whitespace and
/// a sign are accepted, then the leading run of digits is taken and any
/// trailing text (`"150kb"`) is ignored. An absent or empty field falls back
/// to `default_kb` when one is given; a blank but non-empty field is not a
/// number.
pub fn parse_target_size(
    field: Option<&str>,
    default_kb: Option<u32>,
) -> Result<TargetBudget, BudgetError> {
    let Some(raw) = field.filter(|f| !f.is_empty()) else {
        return match default_kb {
            Some(kb) => TargetBudget::from_kilobytes(kb as i64),
            None => Err(BudgetError::Missing),
        };
    };

    let text = raw.trim();
    if text.is_empty() {
        return Err(BudgetError::NotANumber(raw.to_string()));
    }

    let (negative, rest) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return Err(BudgetError::NotANumber(text.to_string()));
    }

    let magnitude = match digits.parse::<i64>() {
        Ok(value) => value,
        Err(_) if negative => return Err(BudgetError::NonPositive(i64::MIN)),
        Err(_) => return Err(BudgetError::TooLarge(i64::MAX)),
    };

    TargetBudget::from_kilobytes(if negative { -magnitude } else { magnitude })
}
