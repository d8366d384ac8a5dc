use std::sync::mpsc;

use crate::render::RenderCtx;

use super::error::ContextError;

/// Bytes per texel of the off-screen surface (RGBA8).
const BYTES_PER_PIXEL: u32 = 4;

/// Copies a `width`×`height` rectangle starting at (`x`, `y`) out of the
/// current surface.
///
/// Returns tightly packed RGBA rows, top row first. Blocks until every
/// previously submitted draw and the copy itself have completed.
pub fn read_pixels(
    ctx: &RenderCtx<'_>,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ContextError> {
    let target = &ctx.target;
    let in_bounds = width > 0
        && height > 0
        && x.checked_add(width).is_some_and(|r| r <= target.width)
        && y.checked_add(height).is_some_and(|b| b <= target.height);
    if !in_bounds {
        return Err(ContextError::ReadbackOutOfBounds {
            x,
            y,
            width,
            height,
            surface_width: target.width,
            surface_height: target.height,
        });
    }

    let tight_bpr = width * BYTES_PER_PIXEL;
    let padded_bpr = align_to(tight_bpr, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    let buffer_size = u64::from(padded_bpr) * u64::from(height);

    let staging = super::check_no_gpu_error(ctx.device, || {
        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("planeblit readback staging"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planeblit readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));
        staging
    })
    .map_err(|message| ContextError::Gpu {
        op: "read_pixels",
        message,
    })?;

    let slice = staging.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    ctx.device.poll(wgpu::PollType::wait_indefinitely())?;
    receiver
        .recv()
        .map_err(|_| ContextError::MapChannelClosed)??;

    let tight = {
        let data = slice.get_mapped_range();
        depad_rows(&data, tight_bpr as usize, padded_bpr as usize, height as usize)
    };
    staging.unmap();
    staging.destroy();

    Ok(tight)
}

/// Rounds `value` up to a multiple of `align` (a power of two).
fn align_to(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

/// Drops the per-row padding wgpu requires for buffer copies.
fn depad_rows(data: &[u8], tight_bpr: usize, padded_bpr: usize, rows: usize) -> Vec<u8> {
    let mut tight = Vec::with_capacity(tight_bpr * rows);
    for row in data.chunks(padded_bpr).take(rows) {
        tight.extend_from_slice(&row[..tight_bpr]);
    }
    tight
}
