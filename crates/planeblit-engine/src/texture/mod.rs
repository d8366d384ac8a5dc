//! Pixel-plane → GPU texture upload.
//!
//! One [`upload`] call per plane. The returned [`Texture`] is owned by the
//! caller and released by [`Texture::destroy`] or on drop.

mod error;
mod format;
mod upload;

pub use error::TextureError;
pub use format::PlaneFormat;
pub use upload::{upload, Texture};
