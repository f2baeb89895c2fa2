//! Caller-facing summary of a compression run.
//!
//! Sizes are reported in kilobytes rounded half-up, the ratio in whole
//! percent, and the image as a `data:` URI so the report can travel as a
//! single JSON document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::budget::BYTES_PER_KB;

/// MIME type of every image jpegfit produces.
pub const JPEG_MIME: &str = "image/jpeg";

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// JSON-ready result of compressing one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub success: bool,
    /// Input size in KB, rounded.
    pub original_size: u64,
    /// Output size in KB, rounded. May exceed the target.
    pub compressed_size: u64,
    /// `round((1 - compressed / original) * 100)`; negative if the output grew.
    pub compression_ratio: i64,
    pub original_dimensions: Dimensions,
    pub compressed_dimensions: Dimensions,
    /// JPEG quality of the returned encoding.
    pub quality: u8,
    /// False when the search exhausted both floors without meeting the target.
    pub within_budget: bool,
    /// `data:image/jpeg;base64,...`
    pub compressed_image: String,
}

/// Round half toward positive infinity, the convention the report format uses.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Byte count to kilobytes, rounded.
pub fn bytes_to_rounded_kb(bytes: usize) -> u64 {
    round_half_up(bytes as f64 / BYTES_PER_KB as f64) as u64
}

/// Percentage saved, rounded. Zero for equal sizes or an empty original.
pub fn compression_ratio(original_len: usize, compressed_len: usize) -> i64 {
    if original_len == 0 {
        return 0;
    }
    let saved = 1.0 - compressed_len as f64 / original_len as f64;
    round_half_up(saved * 100.0) as i64
}

/// Embed JPEG bytes in a base64 `data:` URI.
pub fn to_data_uri(jpeg: &[u8]) -> String {
    format!("data:{};base64,{}", JPEG_MIME, STANDARD.encode(jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
    }

    #[test]
    fn test_bytes_to_rounded_kb() {
        assert_eq!(bytes_to_rounded_kb(0), 0);
        assert_eq!(bytes_to_rounded_kb(511), 0);
        assert_eq!(bytes_to_rounded_kb(512), 1);
        assert_eq!(bytes_to_rounded_kb(2 * 1024 * 1024), 2048);
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(1000, 1000), 0);
        assert_eq!(compression_ratio(1000, 250), 75);
        assert_eq!(compression_ratio(1000, 0), 100);
        // Output larger than input is reported, not clamped
        assert_eq!(compression_ratio(1000, 1500), -50);
        assert_eq!(compression_ratio(0, 10), 0);
    }

    #[test]
    fn test_compression_ratio_rounds_half_up() {
        // 1 - 1005/1000 = -0.5% -> rounds up to 0
        assert_eq!(compression_ratio(1000, 1005), 0);
        // 1 - 995/1000 = 0.5% -> 1
        assert_eq!(compression_ratio(1000, 995), 1);
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
        assert_eq!(to_data_uri(&[]), "data:image/jpeg;base64,");
    }

    #[test]
    fn test_report_json_field_names() {
        let report = CompressionReport {
            success: true,
            original_size: 2048,
            compressed_size: 98,
            compression_ratio: 95,
            original_dimensions: Dimensions {
                width: 3000,
                height: 2000,
            },
            compressed_dimensions: Dimensions {
                width: 3000,
                height: 2000,
            },
            quality: 35,
            within_budget: true,
            compressed_image: "data:image/jpeg;base64,".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["originalSize"], 2048);
        assert_eq!(json["compressedSize"], 98);
        assert_eq!(json["compressionRatio"], 95);
        assert_eq!(json["originalDimensions"]["width"], 3000);
        assert_eq!(json["originalDimensions"]["height"], 2000);
        assert_eq!(json["withinBudget"], true);
        assert!(json["compressedImage"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }
}
