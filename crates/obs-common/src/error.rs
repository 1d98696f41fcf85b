//! Error types for the shared data model.

use thiserror::Error;

/// Result type alias using ObsError.
pub type ObsResult<T> = Result<T, ObsError>;

/// Errors raised by the shared data model.
#[derive(Debug, Error)]
pub enum ObsError {
    /// Bounding box edges are inverted or degenerate.
    #[error("invalid bounds for '{name}': {message}")]
    InvalidBounds { name: String, message: String },
}

impl ObsError {
    /// Create an InvalidBounds error.
    pub fn invalid_bounds(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBounds {
            name: name.into(),
            message: message.into(),
        }
    }
}
