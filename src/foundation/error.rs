/// Convenience result type used across radial-warp.
pub type WarpResult<T> = Result<T, WarpError>;

/// Top-level error taxonomy used by the warp APIs.
///
/// A warp pass itself never fails per pixel; these errors are raised up front
/// while validating configuration and buffer shapes.
#[derive(thiserror::Error, Debug)]
pub enum WarpError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Pixel buffer whose byte length does not match its dimensions.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Errors when serializing or deserializing warp specs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WarpError {
    /// Build a [`WarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WarpError::InvalidBuffer`] value.
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Build a [`WarpError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
