//! jpegfit Core - size-constrained JPEG re-encoding
//!
//! This crate re-encodes an arbitrary raster image as a JPEG no larger than a
//! target size, keeping as much fidelity as a bounded search allows: first
//! lowering the JPEG quality, then shrinking the resolution.
//!
//! Front ends (the WASM binding, the CLI) call [`compress_image`] and map
//! [`CompressError`] onto their own error surfaces.

pub mod budget;
pub mod compress;
pub mod config;
pub mod decode;
pub mod encode;
pub mod report;
pub mod search;

pub use budget::{parse_target_size, BudgetError, TargetBudget};
pub use compress::{compress_image, compress_image_kb, CompressError, CompressionResult};
pub use config::{ConfigError, SearchConfig};
pub use report::{CompressionReport, Dimensions};
pub use search::{encode_to_budget, max_attempts, SearchPhase, SearchState};
