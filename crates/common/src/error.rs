//! Error types shared across Poster Studio crates.

use std::path::PathBuf;

/// Top-level error type for Poster Studio operations.
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("Invalid crop rectangle: {message}")]
    InvalidRectangle { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Composition error: {message}")]
    Composition { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PosterError.
pub type PosterResult<T> = Result<T, PosterError>;

impl PosterError {
    pub fn invalid_rectangle(msg: impl Into<String>) -> Self {
        Self::InvalidRectangle {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error came from an unreadable input image.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Whether this error came from a malformed or out-of-bounds crop.
    pub fn is_invalid_rectangle(&self) -> bool {
        matches!(self, Self::InvalidRectangle { .. })
    }
}
