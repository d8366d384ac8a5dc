use thiserror::Error;

use crate::texture::PlaneFormat;

/// Failure inside a [`RectDrawer`](super::RectDrawer) call.
///
/// Every variant names the drawer operation it came from.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("{op}: drawer has been released")]
    Released { op: &'static str },

    #[error("{op}: texture in slot {slot} has been destroyed")]
    TextureDestroyed { op: &'static str, slot: usize },

    #[error("{op}: slot {slot} expects a {expected:?} texture, got {actual:?}")]
    FormatMismatch {
        op: &'static str,
        slot: usize,
        expected: PlaneFormat,
        actual: PlaneFormat,
    },

    #[error("{op}: target format {actual:?} does not match drawer format {expected:?}")]
    TargetFormat {
        op: &'static str,
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },

    #[error("{op}: gpu error: {message}")]
    Gpu { op: &'static str, message: String },
}
