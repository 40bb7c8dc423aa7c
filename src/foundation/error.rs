pub type StageResult<T> = Result<T, StageError>;

/// Errors raised by the scene tree and renderer.
///
/// Degenerate geometry (empty clip regions, collapsed masks) is never reported here; those cases
/// render nothing and return a zero draw-call count.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// The caller passed an argument that violates an API contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// A render operation could not be carried out.
    #[error("render error: {0}")]
    Render(String),

    /// A pooled handle was used after it had been released.
    #[error("stale handle: slot {index} generation {generation}")]
    StaleHandle {
        /// Slot index of the handle.
        index: u32,
        /// Generation the handle was issued with.
        generation: u32,
    },

    /// Pixel data could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StageError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StageError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
