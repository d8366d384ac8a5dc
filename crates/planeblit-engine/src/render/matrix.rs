use glam::{Mat4, Vec3, Vec4};

/// 4×4 column-major transform applied to texture coordinates `(u, v, 0, 1)`.
///
/// Composition follows matrix multiplication order: `multiply(a, b)` applies
/// `b` first, then `a`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TexMatrix(Mat4);

impl TexMatrix {
    #[inline]
    pub fn identity() -> Self {
        Self(Mat4::IDENTITY)
    }

    /// Mirrors the image top-to-bottom (`v -> 1 - v`).
    pub fn vertical_flip() -> Self {
        Self(
            Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))
                * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0)),
        )
    }

    /// Mirrors the image left-to-right (`u -> 1 - u`).
    pub fn horizontal_flip() -> Self {
        Self(
            Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
                * Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        )
    }

    pub fn multiply(a: &TexMatrix, b: &TexMatrix) -> Self {
        Self(a.0 * b.0)
    }

    #[inline]
    pub fn from_cols_array(m: &[f32; 16]) -> Self {
        Self(Mat4::from_cols_array(m))
    }

    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    #[inline]
    pub(crate) fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.0.to_cols_array_2d()
    }

    /// Transforms a texture coordinate on the CPU, the same way the vertex shader does.
    pub fn apply(&self, u: f32, v: f32) -> (f32, f32) {
        let p = self.0 * Vec4::new(u, v, 0.0, 1.0);
        (p.x, p.y)
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0 == Mat4::IDENTITY
    }
}

impl Default for TexMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
