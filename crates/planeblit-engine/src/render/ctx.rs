use crate::device::{self, ContextError, OffscreenSurface};

/// The "current" rendering context: device/queue plus the bound surface.
///
/// Obtained from [`GpuSurfaceContext::make_current`](crate::device::GpuSurfaceContext::make_current)
/// and passed explicitly to every upload, draw and readback call.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target: RenderTarget<'a>,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, target: RenderTarget<'a>) -> Self {
        Self {
            device,
            queue,
            target,
        }
    }

    /// Reads back a rectangle of the current surface as tight RGBA bytes.
    pub fn read_pixels(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ContextError> {
        device::read_pixels(self, x, y, width, height)
    }

    /// Reads back the whole surface.
    pub fn read_all_pixels(&self) -> Result<Vec<u8>, ContextError> {
        device::read_pixels(self, 0, 0, self.target.width, self.target.height)
    }

    /// Fills the current surface with `color`.
    pub fn clear(&self, color: wgpu::Color) -> Result<(), ContextError> {
        device::check_no_gpu_error(self.device, || {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("planeblit clear encoder"),
                });
            {
                let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("planeblit clear"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: self.target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(color),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            }
            self.queue.submit(std::iter::once(encoder.finish()));
        })
        .map_err(|message| ContextError::Gpu {
            op: "clear",
            message,
        })
    }
}

/// Surface that draws land on.
#[derive(Copy, Clone)]
pub struct RenderTarget<'a> {
    pub texture: &'a wgpu::Texture,
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(surface: &'a OffscreenSurface) -> Self {
        Self {
            texture: surface.texture(),
            view: surface.view(),
            format: device::SURFACE_FORMAT,
            width: surface.width(),
            height: surface.height(),
        }
    }
}
