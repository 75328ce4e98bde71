//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The adapter lacks a capability the configuration asks for.
    #[error("adapter is missing required capability: {0}")]
    MissingCapability(&'static str),

    /// The GPU reported a validation error inside a pass.
    #[error("GPU validation error in {pass}: {message}")]
    Validation { pass: &'static str, message: String },

    /// Mapping the identity staging buffer failed.
    #[error("identity readback failed: {0}")]
    ReadbackFailed(String),

    /// Texture data could not be used.
    #[error("invalid texture: {0}")]
    Texture(#[from] cubepick_core::CubePickError),

    /// Texture image could not be decoded.
    #[error("failed to load texture image: {0}")]
    TextureImage(#[from] image::ImageError),

    /// Surface lost.
    #[error("surface lost")]
    SurfaceLost,

    /// Surface outdated.
    #[error("surface outdated")]
    SurfaceOutdated,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,

    /// Unspecified surface acquisition failure.
    #[error("surface error")]
    SurfaceOther,
}

impl RenderError {
    /// Returns true for surface conditions after which the next frame can proceed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SurfaceLost | Self::SurfaceOutdated | Self::Timeout)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost => Self::SurfaceLost,
            wgpu::SurfaceError::Outdated => Self::SurfaceOutdated,
            wgpu::SurfaceError::OutOfMemory => Self::OutOfMemory,
            wgpu::SurfaceError::Timeout => Self::Timeout,
            wgpu::SurfaceError::Other => Self::SurfaceOther,
        }
    }
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_errors_map_to_transient() {
        assert!(RenderError::from(wgpu::SurfaceError::Lost).is_transient());
        assert!(RenderError::from(wgpu::SurfaceError::Outdated).is_transient());
        assert!(RenderError::from(wgpu::SurfaceError::Timeout).is_transient());
        assert!(!RenderError::from(wgpu::SurfaceError::OutOfMemory).is_transient());
    }

    #[test]
    fn test_validation_is_fatal() {
        let err = RenderError::Validation {
            pass: "identity pass",
            message: "bad".into(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "GPU validation error in identity pass: bad");
    }
}
