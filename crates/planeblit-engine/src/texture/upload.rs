use std::borrow::Cow;

use crate::device;
use crate::render::RenderCtx;

use super::{PlaneFormat, TextureError};

/// GPU-resident copy of one pixel plane.
///
/// Owned exclusively by whoever called [`upload`]. Destroy it before the
/// context it was created under is released.
pub struct Texture {
    /// `None` once destroyed.
    gpu: Option<(wgpu::Texture, wgpu::TextureView)>,
    format: PlaneFormat,
    width: u32,
    height: u32,
}

impl Texture {
    #[inline]
    pub fn format(&self) -> PlaneFormat {
        self.format
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// View used for sampling, or `None` after [`destroy`](Self::destroy).
    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.gpu.as_ref().map(|(_, view)| view)
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.gpu.is_none()
    }

    /// Frees the GPU memory. Later calls do nothing.
    pub fn destroy(&mut self) {
        if let Some((texture, view)) = self.gpu.take() {
            drop(view);
            texture.destroy();
            log::trace!("destroyed {:?} texture {}x{}", self.format, self.width, self.height);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Uploads `plane` as a new 2D texture.
///
/// `plane` must hold exactly `width * height * format.bytes_per_pixel()` bytes,
/// rows top to bottom. GPU errors are checked right after the upload.
pub fn upload(
    ctx: &RenderCtx<'_>,
    plane: &[u8],
    width: u32,
    height: u32,
    format: PlaneFormat,
) -> Result<Texture, TextureError> {
    let expected = format.plane_len(width, height);
    if plane.len() != expected {
        return Err(TextureError::PlaneLength {
            format,
            width,
            height,
            expected,
            actual: plane.len(),
        });
    }

    let max = ctx.device.limits().max_texture_dimension_2d;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TextureError::InvalidSize { width, height, max });
    }

    let texels: Cow<'_, [u8]> = match format {
        PlaneFormat::Rgb8 => Cow::Owned(expand_rgb_to_rgba(plane)),
        PlaneFormat::Luminance8 => Cow::Borrowed(plane),
    };

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device::check_no_gpu_error(ctx.device, || {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(match format {
                PlaneFormat::Rgb8 => "planeblit rgb plane",
                PlaneFormat::Luminance8 => "planeblit luminance plane",
            }),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: format.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * format.texel_size()),
                rows_per_image: Some(height),
            },
            size,
        );
        texture
    })
    .map_err(|message| TextureError::Gpu {
        op: "upload",
        message,
    })?;

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    log::trace!("uploaded {format:?} texture {width}x{height}");

    Ok(Texture {
        gpu: Some((texture, view)),
        format,
        width,
        height,
    })
}

/// Widens packed RGB to RGBA with opaque alpha.
fn expand_rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(u8::MAX);
    }
    rgba
}
