//! Error types for ClipForge.

use thiserror::Error;

/// Main error type for ClipForge operations.
///
/// None of these abort the render loop: callers contain them locally and the
/// host only ever sees a missing or blank clip.
#[derive(Error, Debug)]
pub enum ClipForgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata probe failed: {0}")]
    MetadataProbe(String),

    #[error("Media load failed: {0}")]
    MediaLoad(String),

    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClipForgeError {
    /// Shorthand for an operation that addressed an unknown clip or track.
    pub fn unknown_id(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::InvalidMutation(format!("unknown {kind} id {id}"))
    }
}

/// Result type alias for ClipForge operations.
pub type Result<T> = std::result::Result<T, ClipForgeError>;
