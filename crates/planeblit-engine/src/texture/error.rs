use thiserror::Error;

use super::PlaneFormat;

/// Failure while allocating or filling a texture.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("{format:?} plane for {width}x{height} must be {expected} bytes, got {actual}")]
    PlaneLength {
        format: PlaneFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid texture size {width}x{height} (device maximum is {max})")]
    InvalidSize { width: u32, height: u32, max: u32 },

    #[error("gpu error during {op}: {message}")]
    Gpu { op: &'static str, message: String },
}
