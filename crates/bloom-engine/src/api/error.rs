use thiserror::Error;

/// Failure to apply host-provided data (config, content scripts, manifests).
/// The previous state is kept whenever one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rejected: {0}")]
    Invalid(String),
    #[error("cannot load while {0}")]
    Busy(&'static str),
}
