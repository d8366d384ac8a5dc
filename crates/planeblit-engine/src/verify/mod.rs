//! CPU reference for both colour paths and readback comparison.
//!
//! Comparisons never stop at the first bad pixel: every mismatch is collected
//! into a [`VerificationFailure`], whose [`first`](MismatchReport::first)
//! entry is what a fail-fast check would have reported.

mod failure;
mod oracle;

pub use failure::{MismatchReport, PixelMismatch, VerificationFailure};
pub use oracle::{
    compare_exact, compare_yuv_derived, expected_yuv_pixel, normalized_byte, saturated_convert,
    strip_alpha, DEFAULT_MAX_DIFF,
};
