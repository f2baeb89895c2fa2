//! WASM-compatible wrapper types for compression results.
//!
//! This module provides JavaScript-friendly types that wrap the core jpegfit
//! types, handling the conversion between Rust and JavaScript data representations.

use jpegfit_core::CompressionResult;
use wasm_bindgen::prelude::*;

/// A finished compression for JavaScript, with the JPEG kept as raw bytes.
///
/// Use this instead of the JSON report when the caller wants a `Blob` rather
/// than a data URI.
#[wasm_bindgen]
pub struct JsCompressionResult {
    inner: CompressionResult,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Width of the encoded image in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Height of the encoded image in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn original_width(&self) -> u32 {
        self.inner.original_width
    }

    #[wasm_bindgen(getter)]
    pub fn original_height(&self) -> u32 {
        self.inner.original_height
    }

    /// JPEG quality of the final attempt
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality
    }

    /// Whether the output fits the requested size
    #[wasm_bindgen(getter)]
    pub fn within_budget(&self) -> bool {
        self.inner.within_budget
    }

    #[wasm_bindgen(getter)]
    pub fn original_byte_length(&self) -> usize {
        self.inner.original_len
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.compressed_len()
    }

    /// Whole-percent size reduction (negative if the output grew)
    #[wasm_bindgen(getter)]
    pub fn compression_ratio(&self) -> i32 {
        self.inner.compression_ratio() as i32
    }

    /// Returns the JPEG bytes as a Uint8Array.
    ///
    /// Note: This creates a copy of the encoded data.
    pub fn jpeg(&self) -> Vec<u8> {
        self.inner.jpeg.clone()
    }
}

impl JsCompressionResult {
    pub(crate) fn from_result(inner: CompressionResult) -> Self {
        Self { inner }
    }
}
