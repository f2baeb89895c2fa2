//! Compression WASM bindings.
//!
//! Exposes the core size search to JavaScript, for use from a browser Web
//! Worker or a serverless function handler.
//!
//! # Functions
//!
//! - [`compress_image`] - Compress to a numeric KB target, returning the JSON report
//! - [`compress_form`] - Same, taking the target as a raw form field (defaults to 100 KB)
//! - [`compress_image_with_config`] - Compress with overridden search parameters
//! - [`compress_to_jpeg`] - Compress and return the raw JPEG bytes
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@jpegfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const report = compress_image(bytes, 100);
//! img.src = report.compressedImage;
//! ```

use jpegfit_core::{
    compress_image as core_compress, parse_target_size, CompressError, CompressionReport,
    SearchConfig, TargetBudget,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::JsCompressionResult;

/// Target used by [`compress_form`] when the form omits the field.
pub const DEFAULT_TARGET_KB: u32 = 100;

/// Returned when the config object passed to [`compress_image_with_config`]
/// does not deserialize.
const INVALID_CONFIG_MESSAGE: &str = "Invalid search configuration";

/// Compress an image to at most `target_kb` kilobytes.
///
/// Returns the report object (`success`, `originalSize`, `compressedSize`,
/// `compressionRatio`, `originalDimensions`, `compressedImage`, ...). Errors
/// are plain strings safe to show the user.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], target_kb: i32) -> Result<JsValue, JsValue> {
    let budget = TargetBudget::from_kilobytes(target_kb as i64);
    let report = report_for(bytes, budget, SearchConfig::default()).map_err(to_js_error)?;
    to_js_report(&report)
}

/// Compress an image with the target taken from an upload form field.
///
/// The field is parsed leniently (`"150kb"` is 150); a missing or empty
/// field means [`DEFAULT_TARGET_KB`].
#[wasm_bindgen]
pub fn compress_form(bytes: &[u8], target_size: Option<String>) -> Result<JsValue, JsValue> {
    let budget = parse_target_size(target_size.as_deref(), Some(DEFAULT_TARGET_KB));
    let report = report_for(bytes, budget, SearchConfig::default()).map_err(to_js_error)?;
    to_js_report(&report)
}

/// Compress with search parameters supplied as a JS object.
///
/// Any subset of `initial_quality`, `quality_step`, `min_quality`,
/// `shrink_factor`, `min_width`, `resize_filter` and `max_input_bytes` may be
/// given; `undefined` or `null` uses the defaults.
#[wasm_bindgen]
pub fn compress_image_with_config(
    bytes: &[u8],
    target_kb: i32,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config: SearchConfig = if config.is_undefined() || config.is_null() {
        SearchConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|e| {
            log::error!("Rejected search config: {}", e);
            JsValue::from_str(INVALID_CONFIG_MESSAGE)
        })?
    };

    let report = report_for(bytes, TargetBudget::from_kilobytes(target_kb as i64), config)
        .map_err(to_js_error)?;
    to_js_report(&report)
}

/// Compress and return the encoded JPEG with its metadata, without base64.
#[wasm_bindgen]
pub fn compress_to_jpeg(bytes: &[u8], target_kb: i32) -> Result<JsCompressionResult, JsValue> {
    let budget = TargetBudget::from_kilobytes(target_kb as i64).map_err(CompressError::from);
    budget
        .and_then(|budget| core_compress(bytes, budget, &SearchConfig::default()))
        .map(JsCompressionResult::from_result)
        .map_err(to_js_error)
}

/// Shared path of every binding: validate the budget, then compress.
pub(crate) fn report_for<E>(
    bytes: &[u8],
    budget: Result<TargetBudget, E>,
    config: SearchConfig,
) -> Result<CompressionReport, CompressError>
where
    CompressError: From<E>,
{
    let budget = budget?;
    let result = core_compress(bytes, budget, &config)?;
    Ok(result.to_report())
}

/// Log server-side failures with detail; hand the caller only the public message.
pub(crate) fn log_failure(err: &CompressError) -> &'static str {
    if !err.is_client_error() {
        log::error!("Compression error: {}", err);
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&JsValue::from_str(&format!("Compression error: {}", err)));
    }
    err.public_message()
}

fn to_js_error(err: CompressError) -> JsValue {
    JsValue::from_str(log_failure(&err))
}

fn to_js_report(report: &CompressionReport) -> Result<JsValue, JsValue> {
    report
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| {
            log::error!("Report serialization failed: {}", e);
            JsValue::from_str("Failed to compress image")
        })
}

/// Tests for the compression bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32 targets, so
/// these exercise the shared path underneath them.
#[cfg(test)]
mod tests {
    use super::*;
    use jpegfit_core::BudgetError;

    fn tiny_jpeg() -> Vec<u8> {
        jpegfit_core::encode::encode_jpeg(
            &jpegfit_core::decode::DecodedImage::new(16, 16, vec![200u8; 16 * 16 * 3]),
            90,
        )
        .unwrap()
    }

    #[test]
    fn test_report_for_valid_input() {
        let report = report_for(
            &tiny_jpeg(),
            TargetBudget::from_kilobytes(10),
            SearchConfig::default(),
        )
        .unwrap();

        assert!(report.success);
        assert_eq!(report.original_dimensions.width, 16);
        assert!(report.compressed_image.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_form_field_default_applies() {
        let budget = parse_target_size(None, Some(DEFAULT_TARGET_KB));
        let report = report_for(&tiny_jpeg(), budget, SearchConfig::default()).unwrap();
        assert!(report.within_budget);
    }

    #[test]
    fn test_budget_error_checked_before_input() {
        let err = report_for(&[], TargetBudget::from_kilobytes(0), SearchConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CompressError::InvalidBudget(BudgetError::NonPositive(0))
        ));
        assert_eq!(log_failure(&err), "Invalid target size");
    }

    #[test]
    fn test_server_errors_are_opaque() {
        // PNG signature followed by garbage instead of an IHDR chunk
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0x42; 64]);
        let err = report_for(
            &bytes,
            TargetBudget::from_kilobytes(10),
            SearchConfig::default(),
        )
        .unwrap_err();

        assert!(!err.is_client_error());
        assert_eq!(log_failure(&err), "Failed to compress image");
    }
}

/// WASM-specific tests that require JsValue.
///
/// Run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn tiny_jpeg() -> Vec<u8> {
        jpegfit_core::encode::encode_jpeg(
            &jpegfit_core::decode::DecodedImage::new(16, 16, vec![200u8; 16 * 16 * 3]),
            90,
        )
        .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_compress_image_returns_report() {
        let report = compress_image(&tiny_jpeg(), 10).unwrap();
        let report: CompressionReport = serde_wasm_bindgen::from_value(report).unwrap();
        assert!(report.success);
    }

    #[wasm_bindgen_test]
    fn test_compress_image_rejects_zero_target() {
        let err = compress_image(&tiny_jpeg(), 0).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Invalid target size");
    }

    #[wasm_bindgen_test]
    fn test_compress_form_parses_field() {
        assert!(compress_form(&tiny_jpeg(), Some("50kb".to_string())).is_ok());
        assert!(compress_form(&tiny_jpeg(), None).is_ok());
        assert!(compress_form(&tiny_jpeg(), Some("abc".to_string())).is_err());
    }

    #[wasm_bindgen_test]
    fn test_compress_to_jpeg_bytes() {
        let result = compress_to_jpeg(&tiny_jpeg(), 10).unwrap();
        assert_eq!(&result.jpeg()[0..2], &[0xFF, 0xD8]);
        assert!(result.within_budget());
    }

    #[wasm_bindgen_test]
    fn test_bad_config_object_gets_fixed_message() {
        let err = compress_image_with_config(&tiny_jpeg(), 10, JsValue::from_str("fast please"))
            .unwrap_err();
        assert_eq!(err.as_string().unwrap(), INVALID_CONFIG_MESSAGE);
    }

    #[wasm_bindgen_test]
    fn test_compress_with_config_object() {
        let config = serde_wasm_bindgen::to_value(&SearchConfig::default()).unwrap();
        assert!(compress_image_with_config(&tiny_jpeg(), 10, config).is_ok());
        assert!(compress_image_with_config(&tiny_jpeg(), 10, JsValue::UNDEFINED).is_ok());
    }
}
