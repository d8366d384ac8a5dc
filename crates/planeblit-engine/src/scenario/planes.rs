use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::ScenarioParams;

/// Full-resolution Y, U and V planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YuvPlanes {
    pub y: Vec<u8>,
    pub u: Vec<u8>,
    pub v: Vec<u8>,
}

/// Random packed RGB plane (`width * height * 3` bytes) for `params.seed`.
pub fn random_rgb_plane(params: &ScenarioParams) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut plane = vec![0u8; params.pixel_count() * 3];
    rng.fill_bytes(&mut plane);
    plane
}

/// Random Y, U, V planes for `params.seed`, drawn in that order from one generator.
pub fn random_yuv_planes(params: &ScenarioParams) -> YuvPlanes {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut next_plane = || {
        let mut plane = vec![0u8; params.pixel_count()];
        rng.fill_bytes(&mut plane);
        plane
    };

    let y = next_plane();
    let u = next_plane();
    let v = next_plane();
    YuvPlanes { y, u, v }
}
