use thiserror::Error;

use crate::device::ContextError;
use crate::render::DrawError;
use crate::texture::TextureError;

/// Infrastructure failure that aborted a scenario.
///
/// Pixel mismatches are not errors here; they travel in
/// [`ScenarioOutcome::verification`](super::ScenarioOutcome::verification).
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}
