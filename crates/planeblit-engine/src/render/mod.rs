//! Textured-quad rendering.
//!
//! [`RectDrawer`] draws one surface-filling quad per call, sampling either a
//! single RGB texture or three luminance planes (Y, U, V) that are converted
//! to RGB in the fragment shader.
//!
//! Convention:
//! - texture coordinates run from (0, 0) at the top-left to (1, 1) at the
//!   bottom-right, matching the row order of uploaded planes and readback
//! - the [`TexMatrix`] is applied to `(u, v, 0, 1)` in the vertex shader

mod common;
mod ctx;
mod drawer;
mod error;
mod matrix;

pub use ctx::{RenderCtx, RenderTarget};
pub use drawer::RectDrawer;
pub use error::DrawError;
pub use matrix::TexMatrix;
