use crate::device::{GpuInit, GpuSurfaceContext};
use crate::render::{RectDrawer, RenderCtx, TexMatrix};
use crate::texture::{self, PlaneFormat};
use crate::verify::{self, VerificationFailure};

use super::{random_rgb_plane, random_yuv_planes, ScenarioError, ScenarioParams};

/// Result of a scenario that ran to completion.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub params: ScenarioParams,
    /// Tight RGBA readback of the whole surface.
    pub readback: Vec<u8>,
    pub verification: Result<(), VerificationFailure>,
}

impl ScenarioOutcome {
    #[inline]
    pub fn passed(&self) -> bool {
        self.verification.is_ok()
    }
}

/// Uploads `rgb`, draws it with `matrix` into the current target and reads
/// the full target back as RGBA.
///
/// The texture and drawer are released before returning, on success or error.
pub fn render_rgb(
    ctx: &RenderCtx<'_>,
    rgb: &[u8],
    width: u32,
    height: u32,
    matrix: &TexMatrix,
) -> Result<Vec<u8>, ScenarioError> {
    let mut texture = texture::upload(ctx, rgb, width, height, PlaneFormat::Rgb8)?;
    let mut drawer = RectDrawer::new(ctx)?;

    drawer.draw_rgb(ctx, &texture, matrix)?;
    let rgba = ctx.read_all_pixels()?;

    drawer.release();
    texture.destroy();
    Ok(rgba)
}

/// Uploads the three planes, draws them through the YUV path with `matrix`
/// and reads the full target back as RGBA.
pub fn render_yuv(
    ctx: &RenderCtx<'_>,
    planes: [&[u8]; 3],
    width: u32,
    height: u32,
    matrix: &TexMatrix,
) -> Result<Vec<u8>, ScenarioError> {
    let mut textures = Vec::with_capacity(3);
    for plane in planes {
        textures.push(texture::upload(ctx, plane, width, height, PlaneFormat::Luminance8)?);
    }
    let mut drawer = RectDrawer::new(ctx)?;

    drawer.draw_yuv(ctx, [&textures[0], &textures[1], &textures[2]], matrix)?;
    let rgba = ctx.read_all_pixels()?;

    drawer.release();
    for texture in &mut textures {
        texture.destroy();
    }
    Ok(rgba)
}

/// Seeded RGB round trip: the alpha-stripped readback must equal the input.
pub fn run_rgb_scenario(
    params: ScenarioParams,
    init: &GpuInit,
) -> Result<ScenarioOutcome, ScenarioError> {
    let ScenarioParams { width, height, .. } = params;
    let rgb = random_rgb_plane(&params);

    let mut context = GpuSurfaceContext::create(None, init)?;
    context.create_surface(width, height)?;
    let readback = {
        let ctx = context.make_current()?;
        render_rgb(&ctx, &rgb, width, height, &TexMatrix::identity())?
    };
    context.release();

    let verification = verify::strip_alpha(&readback)
        .and_then(|actual| verify::compare_exact(&actual, &rgb, width, height));
    log_outcome("rgb", &params, &verification);

    Ok(ScenarioOutcome {
        params,
        readback,
        verification,
    })
}

/// Seeded YUV conversion: every channel must be within `max_diff` of the
/// reference and alpha must be 255.
pub fn run_yuv_scenario(
    params: ScenarioParams,
    init: &GpuInit,
    max_diff: f32,
) -> Result<ScenarioOutcome, ScenarioError> {
    let ScenarioParams { width, height, .. } = params;
    let planes = random_yuv_planes(&params);

    let mut context = GpuSurfaceContext::create(None, init)?;
    context.create_surface(width, height)?;
    let readback = {
        let ctx = context.make_current()?;
        render_yuv(
            &ctx,
            [planes.y.as_slice(), planes.u.as_slice(), planes.v.as_slice()],
            width,
            height,
            &TexMatrix::identity(),
        )?
    };
    context.release();

    let verification = verify::compare_yuv_derived(
        &readback, &planes.y, &planes.u, &planes.v, width, height, max_diff,
    );
    log_outcome("yuv", &params, &verification);

    Ok(ScenarioOutcome {
        params,
        readback,
        verification,
    })
}

fn log_outcome(
    path: &str,
    params: &ScenarioParams,
    verification: &Result<(), VerificationFailure>,
) {
    match verification {
        Ok(()) => log::info!(
            "{path} scenario {}x{} seed {} passed",
            params.width,
            params.height,
            params.seed
        ),
        Err(failure) => log::warn!(
            "{path} scenario {}x{} seed {} failed: {failure}",
            params.width,
            params.height,
            params.seed
        ),
    }
}
