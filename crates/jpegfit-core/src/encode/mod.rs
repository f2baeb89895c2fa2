//! JPEG encoding for jpegfit.
//!
//! Every attempt made by the size search goes through [`encode_jpeg`].

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY};
