use thiserror::Error;

/// Failure to create, bind, or read back a rendering context / surface.
///
/// These are infrastructure failures: the scenario that hit one is aborted and
/// never retried.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no suitable GPU adapter")]
    NoAdapter(#[source] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("invalid surface size {width}x{height} (device maximum is {max})")]
    InvalidSurfaceSize { width: u32, height: u32, max: u32 },

    #[error("no off-screen surface has been created for this context")]
    NoSurface,

    #[error("context has been released")]
    Released,

    #[error(
        "readback rectangle ({x}, {y}) {width}x{height} exceeds surface {surface_width}x{surface_height}"
    )]
    ReadbackOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    #[error("failed to map readback buffer")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("readback buffer mapping was never signalled")]
    MapChannelClosed,

    #[error("device poll failed")]
    Poll(#[from] wgpu::PollError),

    #[error("gpu error during {op}: {message}")]
    Gpu { op: &'static str, message: String },
}
