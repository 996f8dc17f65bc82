//! Error types for the animation editor
//!
//! Validation failures are reported synchronously to the caller. Out-of-range
//! structural operations (cell coordinates, frame indices, neighbour swaps) are
//! not errors and never produce one of these.

use thiserror::Error;

use crate::models::GridId;

/// Result alias used throughout the crate
pub type AnimResult<T> = Result<T, AnimError>;

/// Top-level error type for the editor core
#[derive(Debug, Error)]
pub enum AnimError {
    /// A frame record violates the grid validity rule
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// An animation document is structurally wrong
    #[error("Invalid animation: {0}")]
    InvalidAnimation(String),

    /// Input text is not JSON at all
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fetch failed or the server answered with a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// Browser storage unavailable or rejected a write
    #[error("Storage error: {0}")]
    Storage(String),

    /// An HTML template failed to compile or render
    #[error("Template error: {0}")]
    Template(String),

    /// Editor configuration rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The collection does not manage a grid with this id
    #[error("Unknown grid: {0}")]
    UnknownGrid(GridId),
}

impl AnimError {
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    pub fn invalid_animation(msg: impl Into<String>) -> Self {
        Self::InvalidAnimation(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for errors caused by malformed input documents
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFrame(_) | Self::InvalidAnimation(_) | Self::Json(_)
        )
    }
}
