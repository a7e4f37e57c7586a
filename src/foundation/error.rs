use std::path::PathBuf;

/// Convenience result type used across photoreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by slideshow APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed or missing input from the asset side (zero slides, length mismatches, bad
    /// configuration values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caption text could not be shaped or laid out.
    ///
    /// The slide composer recovers from this locally; it only escapes when a caller shapes text
    /// directly.
    #[error("caption render failure: {0}")]
    CaptionRender(String),

    /// The encoder failed. Carries the attempted output path and the encoder's own message.
    #[error("encode failure for '{}': {message}", path.display())]
    Encode {
        /// Output file that was being written.
        path: PathBuf,
        /// Underlying encoder error, verbatim.
        message: String,
    },

    /// Errors when serializing or deserializing configuration or reports.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`ReelError::CaptionRender`] value.
    pub fn caption_render(msg: impl Into<String>) -> Self {
        Self::CaptionRender(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
