use super::{MismatchReport, PixelMismatch, VerificationFailure};

/// Allowed per-channel slack for the YUV path (0-255 scale).
///
/// Covers float evaluation order on the GPU and unorm rounding on store.
pub const DEFAULT_MAX_DIFF: f32 = 1.0;

// Conversion constants shared with shaders/yuv.wgsl.
const R_FROM_V: f32 = 1.403;
const G_FROM_U: f32 = 0.344;
const G_FROM_V: f32 = 0.714;
const B_FROM_U: f32 = 1.770;

/// Maps a byte to `[0, 1]`.
#[inline]
pub fn normalized_byte(b: u8) -> f32 {
    f32::from(b) / 255.0
}

/// Clamps `c` to `[0, 1]` and scales it to `[0, 255]`, unrounded.
#[inline]
pub fn saturated_convert(c: f32) -> f32 {
    255.0 * c.clamp(0.0, 1.0)
}

/// Reference RGB (0-255, unrounded) for one Y/U/V sample triple.
pub fn expected_yuv_pixel(y: u8, u: u8, v: u8) -> [f32; 3] {
    let y = normalized_byte(y);
    let u = normalized_byte(u) - 0.5;
    let v = normalized_byte(v) - 0.5;

    [
        saturated_convert(y + R_FROM_V * v),
        saturated_convert(y - G_FROM_U * u - G_FROM_V * v),
        saturated_convert(y + B_FROM_U * u),
    ]
}

/// Drops every fourth byte of an RGBA buffer.
pub fn strip_alpha(rgba: &[u8]) -> Result<Vec<u8>, VerificationFailure> {
    if rgba.len() % 4 != 0 {
        return Err(VerificationFailure::NotRgba { len: rgba.len() });
    }
    Ok(rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect())
}

/// Requires two packed RGB buffers to be identical.
///
/// Both must hold exactly `width * height * 3` bytes. Every differing pixel is
/// reported.
pub fn compare_exact(
    actual: &[u8],
    expected: &[u8],
    width: u32,
    height: u32,
) -> Result<(), VerificationFailure> {
    let len = pixel_count(width, height) * 3;
    check_len("actual", actual, len)?;
    check_len("expected", expected, len)?;

    let mismatches = actual
        .chunks_exact(3)
        .zip(expected.chunks_exact(3))
        .enumerate()
        .filter(|(_, (a, e))| a != e)
        .map(|(i, (a, e))| {
            let (x, y) = coords(i, width);
            PixelMismatch {
                x,
                y,
                expected: [f32::from(e[0]), f32::from(e[1]), f32::from(e[2])],
                actual: [a[0], a[1], a[2]],
                actual_alpha: None,
            }
        })
        .collect();

    finish(width, height, mismatches)
}

/// Checks an RGBA readback against the YUV reference formula.
///
/// Each channel must satisfy `|actual - expected| < max_diff` and alpha must be
/// exactly 255. Planes are full resolution, one byte per pixel.
pub fn compare_yuv_derived(
    actual_rgba: &[u8],
    y_plane: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    width: u32,
    height: u32,
    max_diff: f32,
) -> Result<(), VerificationFailure> {
    let n = pixel_count(width, height);
    check_len("actual RGBA", actual_rgba, n * 4)?;
    check_len("Y plane", y_plane, n)?;
    check_len("U plane", u_plane, n)?;
    check_len("V plane", v_plane, n)?;

    let mut mismatches = Vec::new();
    for (i, px) in actual_rgba.chunks_exact(4).enumerate() {
        let expected = expected_yuv_pixel(y_plane[i], u_plane[i], v_plane[i]);
        let actual = [px[0], px[1], px[2]];
        let alpha = px[3];

        let within = actual
            .iter()
            .zip(expected)
            .all(|(&a, e)| (f32::from(a) - e).abs() < max_diff);

        if !within || alpha != u8::MAX {
            let (x, y) = coords(i, width);
            mismatches.push(PixelMismatch {
                x,
                y,
                expected,
                actual,
                actual_alpha: Some(alpha),
            });
        }
    }

    finish(width, height, mismatches)
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn coords(index: usize, width: u32) -> (u32, u32) {
    let w = width as usize;
    ((index % w) as u32, (index / w) as u32)
}

fn check_len(what: &'static str, buf: &[u8], expected: usize) -> Result<(), VerificationFailure> {
    if buf.len() != expected {
        return Err(VerificationFailure::BufferLength {
            what,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn finish(
    width: u32,
    height: u32,
    mismatches: Vec<PixelMismatch>,
) -> Result<(), VerificationFailure> {
    if mismatches.is_empty() {
        return Ok(());
    }
    log::warn!(
        "{} of {} pixels failed verification",
        mismatches.len(),
        pixel_count(width, height)
    );
    Err(VerificationFailure::Mismatch(MismatchReport {
        width,
        height,
        mismatches,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What an ideal GPU would store: round-to-nearest unorm, opaque alpha.
    fn ideal_readback(y: &[u8], u: &[u8], v: &[u8]) -> Vec<u8> {
        y.iter()
            .zip(u)
            .zip(v)
            .flat_map(|((&y, &u), &v)| {
                let [r, g, b] = expected_yuv_pixel(y, u, v);
                [r.round() as u8, g.round() as u8, b.round() as u8, 255]
            })
            .collect()
    }

    // ── reference formula ─────────────────────────────────────────────────

    #[test]
    fn saturated_convert_clamps_both_ends() {
        assert_eq!(saturated_convert(-0.3), 0.0);
        assert_eq!(saturated_convert(1.7), 255.0);
        assert_eq!(saturated_convert(0.5), 127.5);
    }

    #[test]
    fn normalized_byte_spans_unit_interval() {
        assert_eq!(normalized_byte(0), 0.0);
        assert_eq!(normalized_byte(255), 1.0);
    }

    #[test]
    fn saturated_yuv_clamps_to_full_scale() {
        let [r, g, b] = expected_yuv_pixel(255, 255, 255);
        assert_eq!(r, 255.0);
        assert_eq!(b, 255.0);
        assert!((g - 255.0 * (1.0 - 0.344 * 0.5 - 0.714 * 0.5)).abs() < 0.01);
    }

    #[test]
    fn dark_yuv_clamps_to_zero() {
        let [r, g, b] = expected_yuv_pixel(0, 0, 0);
        assert_eq!(r, 0.0);
        assert_eq!(b, 0.0);
        assert!((g - 255.0 * (0.344 * 0.5 + 0.714 * 0.5)).abs() < 0.01);
    }

    #[test]
    fn neutral_chroma_is_nearly_grey() {
        let [r, g, b] = expected_yuv_pixel(100, 128, 128);
        for c in [r, g, b] {
            assert!((c - 100.0).abs() < 1.0, "channel {c} far from grey");
        }
    }

    // ── strip_alpha ───────────────────────────────────────────────────────

    #[test]
    fn strip_alpha_drops_every_fourth_byte() {
        let rgba = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(strip_alpha(&rgba).unwrap(), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn strip_alpha_rejects_partial_pixels() {
        assert_eq!(
            strip_alpha(&[1, 2, 3]),
            Err(VerificationFailure::NotRgba { len: 3 })
        );
    }

    // ── compare_exact ─────────────────────────────────────────────────────

    #[test]
    fn identical_buffers_pass() {
        let buf: Vec<u8> = (0..2 * 2 * 3).collect();
        assert!(compare_exact(&buf, &buf, 2, 2).is_ok());
    }

    #[test]
    fn every_differing_pixel_is_reported() {
        let expected: Vec<u8> = vec![10; 3 * 2 * 3];
        let mut actual = expected.clone();
        actual[3] = 11; // (1, 0) red
        actual[17] = 0; // (2, 1) blue

        let err = compare_exact(&actual, &expected, 3, 2).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!((report.mismatches[0].x, report.mismatches[0].y), (1, 0));
        assert_eq!(report.mismatches[0].actual, [11, 10, 10]);
        assert_eq!(report.mismatches[0].expected, [10.0, 10.0, 10.0]);
        assert_eq!((report.mismatches[1].x, report.mismatches[1].y), (2, 1));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = compare_exact(&[0; 11], &[0; 12], 2, 2).unwrap_err();
        assert_eq!(
            err,
            VerificationFailure::BufferLength {
                what: "actual",
                expected: 12,
                actual: 11,
            }
        );
    }

    // ── compare_yuv_derived ───────────────────────────────────────────────

    #[test]
    fn rounded_reference_passes() {
        let y: Vec<u8> = (0..=255).collect();
        let u: Vec<u8> = (0..=255).rev().collect();
        let v: Vec<u8> = (0..=255).map(|i: u8| i.wrapping_mul(37)).collect();
        let rgba = ideal_readback(&y, &u, &v);
        assert!(compare_yuv_derived(&rgba, &y, &u, &v, 16, 16, DEFAULT_MAX_DIFF).is_ok());
    }

    #[test]
    fn off_by_two_channel_fails() {
        let (y, u, v) = ([90u8; 4], [128u8; 4], [128u8; 4]);
        let mut rgba = ideal_readback(&y, &u, &v);
        rgba[4 + 1] = rgba[4 + 1].wrapping_add(2);

        let err = compare_yuv_derived(&rgba, &y, &u, &v, 2, 2, DEFAULT_MAX_DIFF).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!((report.mismatches[0].x, report.mismatches[0].y), (1, 0));
    }

    #[test]
    fn translucent_alpha_fails() {
        let (y, u, v) = ([200u8; 1], [30u8; 1], [220u8; 1]);
        let mut rgba = ideal_readback(&y, &u, &v);
        rgba[3] = 254;

        let err = compare_yuv_derived(&rgba, &y, &u, &v, 1, 1, DEFAULT_MAX_DIFF).unwrap_err();
        assert_eq!(err.report().unwrap().mismatches[0].actual_alpha, Some(254));
    }

    #[test]
    fn clamped_channels_read_back_as_extremes() {
        // R and B overflow, then underflow.
        let (y, u, v) = ([255u8, 0], [255u8, 0], [255u8, 0]);
        let rgba = ideal_readback(&y, &u, &v);
        assert_eq!((rgba[0], rgba[2]), (255, 255));
        assert_eq!((rgba[4], rgba[6]), (0, 0));
        assert!(compare_yuv_derived(&rgba, &y, &u, &v, 2, 1, DEFAULT_MAX_DIFF).is_ok());
    }

    #[test]
    fn short_plane_is_rejected() {
        let err = compare_yuv_derived(&[0; 16], &[0; 4], &[0; 3], &[0; 4], 2, 2, 1.0)
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationFailure::BufferLength { what: "U plane", .. }
        ));
    }
}
