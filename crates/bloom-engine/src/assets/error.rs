use thiserror::Error;

/// The external image service could not produce an asset.
/// Recoverable: the player retries from the generation screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation of `{key}` failed: {message}")]
pub struct GenerationError {
    pub key: String,
    pub message: String,
}

impl GenerationError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// An asset was looked up but never stored. Renderers treat this as a gap
/// (placeholder or nothing), never as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset `{key}` is missing")]
pub struct MissingAssetError {
    pub key: String,
}
