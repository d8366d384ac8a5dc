/// Layout of a CPU-side pixel plane.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlaneFormat {
    /// Interleaved 8-bit R, G, B.
    Rgb8,
    /// One 8-bit sample per pixel (a Y, U or V plane).
    Luminance8,
}

impl PlaneFormat {
    /// Bytes per pixel in the CPU plane.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PlaneFormat::Rgb8 => 3,
            PlaneFormat::Luminance8 => 1,
        }
    }

    /// GPU texel format the plane is stored as.
    ///
    /// wgpu has no three-byte format, so RGB planes are widened to RGBA.
    #[inline]
    pub const fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            PlaneFormat::Rgb8 => wgpu::TextureFormat::Rgba8Unorm,
            PlaneFormat::Luminance8 => wgpu::TextureFormat::R8Unorm,
        }
    }

    /// Bytes per texel once uploaded.
    #[inline]
    pub const fn texel_size(self) -> u32 {
        match self {
            PlaneFormat::Rgb8 => 4,
            PlaneFormat::Luminance8 => 1,
        }
    }

    /// Required plane length for a `width`×`height` image.
    pub fn plane_len(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_lengths() {
        assert_eq!(PlaneFormat::Rgb8.plane_len(16, 16), 768);
        assert_eq!(PlaneFormat::Luminance8.plane_len(16, 17), 272);
        assert_eq!(PlaneFormat::Rgb8.plane_len(1, 1), 3);
    }

    #[test]
    fn rgb_is_widened_on_the_gpu() {
        assert_eq!(PlaneFormat::Rgb8.texture_format(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(PlaneFormat::Rgb8.texel_size(), 4);
        assert_eq!(PlaneFormat::Luminance8.texture_format(), wgpu::TextureFormat::R8Unorm);
    }
}
