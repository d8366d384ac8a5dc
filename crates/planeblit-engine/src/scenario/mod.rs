//! Seeded end-to-end render + verify scenarios.
//!
//! A scenario creates its own context, uploads seeded random planes, draws
//! them, reads the surface back, compares it with the CPU reference, and
//! releases everything before returning.

mod error;
mod planes;
mod run;

pub use error::ScenarioError;
pub use planes::{random_rgb_plane, random_yuv_planes, YuvPlanes};
pub use run::{render_rgb, render_yuv, run_rgb_scenario, run_yuv_scenario, ScenarioOutcome};

/// Image size and content seed of one scenario.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScenarioParams {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl ScenarioParams {
    #[inline]
    pub const fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
        }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::new(16, 16, 42)
    }
}
