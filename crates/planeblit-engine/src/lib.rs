//! planeblit engine crate.
//!
//! Headless rendering of raw pixel planes through a textured-quad pipeline:
//! packed RGB is drawn as-is, three-plane YUV is converted to RGB in the
//! fragment shader, and the off-screen result can be read back and checked
//! against a CPU reference.
//!
//! Typical flow:
//! 1. [`device::GpuSurfaceContext::create`] + `create_surface` + `make_current`
//! 2. [`texture::upload`] one texture per plane
//! 3. [`render::RectDrawer::draw_rgb`] / [`render::RectDrawer::draw_yuv`]
//! 4. [`render::RenderCtx::read_pixels`] and a [`verify`] comparison
//! 5. release textures, drawer, then the context

pub mod device;
pub mod logging;
pub mod render;
pub mod scenario;
pub mod texture;
pub mod verify;
