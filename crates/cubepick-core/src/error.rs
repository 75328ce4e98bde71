//! Error types for cubepick.

use thiserror::Error;

/// The main error type for cubepick operations that do not touch the GPU.
#[derive(Error, Debug)]
pub enum CubePickError {
    /// Texture data does not hold `width * height * 4` bytes.
    #[error("texture data size mismatch: expected {expected} bytes, got {actual}")]
    TextureSizeMismatch { expected: usize, actual: usize },

    /// Texture has a zero dimension.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },

    /// Viewport has a zero dimension.
    #[error("viewport dimensions must be non-zero, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },

    /// An option value is outside its valid range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for cubepick operations.
pub type Result<T> = std::result::Result<T, CubePickError>;
