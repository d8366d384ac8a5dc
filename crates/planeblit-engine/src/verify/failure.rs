use std::fmt;

use thiserror::Error;

/// Pixels listed in a failure message before the remainder is summarized.
const MAX_LISTED: usize = 8;

/// One pixel whose readback does not match the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMismatch {
    pub x: u32,
    pub y: u32,
    /// Reference colour on the 0-255 scale (unrounded for the YUV path).
    pub expected: [f32; 3],
    pub actual: [u8; 3],
    /// Read-back alpha, when the comparison checks it.
    pub actual_alpha: Option<u8>,
}

impl fmt::Display for PixelMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [er, eg, eb] = self.expected;
        let [ar, ag, ab] = self.actual;
        write!(
            f,
            "({}, {}): expected (R,G,B) ({er}, {eg}, {eb}) but was ({ar}, {ag}, {ab})",
            self.x, self.y
        )?;
        if let Some(a) = self.actual_alpha.filter(|&a| a != u8::MAX) {
            write!(f, " with alpha {a}")?;
        }
        Ok(())
    }
}

/// All mismatching pixels of one comparison, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchReport {
    pub width: u32,
    pub height: u32,
    pub mismatches: Vec<PixelMismatch>,
}

impl MismatchReport {
    /// First mismatching pixel in row-major order.
    pub fn first(&self) -> Option<&PixelMismatch> {
        self.mismatches.first()
    }

    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} pixels differ in {}x{} image",
            self.mismatches.len(),
            u64::from(self.width) * u64::from(self.height),
            self.width,
            self.height
        )?;
        for m in self.mismatches.iter().take(MAX_LISTED) {
            write!(f, "\n  {m}")?;
        }
        if self.mismatches.len() > MAX_LISTED {
            write!(f, "\n  ... and {} more", self.mismatches.len() - MAX_LISTED)?;
        }
        Ok(())
    }
}

/// A readback that disagrees with the CPU reference.
///
/// Unlike context/texture/draw errors this points at a pipeline or colour-math
/// bug, not at the environment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationFailure {
    #[error("{what} buffer holds {actual} bytes, expected {expected}")]
    BufferLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("RGBA buffer length {len} is not a multiple of 4")]
    NotRgba { len: usize },

    #[error("{0}")]
    Mismatch(MismatchReport),
}

impl VerificationFailure {
    /// Mismatch details, if the buffers had the right shape.
    pub fn report(&self) -> Option<&MismatchReport> {
        match self {
            VerificationFailure::Mismatch(report) => Some(report),
            _ => None,
        }
    }
}
