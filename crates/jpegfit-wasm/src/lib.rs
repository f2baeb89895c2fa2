//! jpegfit WASM - WebAssembly bindings for jpegfit
//!
//! This crate exposes the jpegfit-core size search to JavaScript/TypeScript,
//! so the browser or a serverless handler can shrink an image to a target
//! size with the same routine the CLI uses.
//!
//! # Module Structure
//!
//! - `compress` - Compression entry points returning a report or raw JPEG
//! - `types` - WASM-compatible wrapper types for results
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_form } from '@jpegfit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const report = compress_form(bytes, formData.get('targetSize'));
//! console.log(`${report.originalSize} KB -> ${report.compressedSize} KB`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

// Re-export public types
pub use compress::{
    compress_form, compress_image, compress_image_with_config, compress_to_jpeg,
    DEFAULT_TARGET_KB,
};
pub use types::JsCompressionResult;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
