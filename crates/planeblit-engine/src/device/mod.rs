//! Headless GPU context + off-screen surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - allocating the fixed-size off-screen colour target
//! - handing out the explicit "current" [`RenderCtx`](crate::render::RenderCtx)
//! - reading rendered pixels back into CPU memory

mod context;
mod error;
mod init;
mod readback;
mod scope;
mod surface;

pub use context::GpuSurfaceContext;
pub use error::ContextError;
pub use init::GpuInit;
pub use readback::read_pixels;
pub use surface::{OffscreenSurface, SURFACE_FORMAT};

pub(crate) use scope::check_no_gpu_error;
