/// Convenience result type used across storycut.
pub type StorycutResult<T> = Result<T, StorycutError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Passthrough ineligibility is never reported through this type; it is the
/// expected, common case and silently routes to composite rendering.
#[derive(thiserror::Error, Debug)]
pub enum StorycutError {
    /// Invalid user-provided storyboard, options or call arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while resolving timeline state for a master frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors reported by a video source or still-image decoder.
    #[error("decode error: {0}")]
    Decode(String),

    /// A compressed chunk did not fit the caller-supplied buffer bound.
    #[error("chunk of {size} bytes exceeds the {max} byte limit")]
    ChunkOverflow {
        /// Actual chunk size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        max: usize,
    },

    /// The composite renderer could not produce an image.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorycutError {
    /// Build a [`StorycutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StorycutError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StorycutError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`StorycutError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StorycutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
