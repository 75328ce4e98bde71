//! Error type of the cubepick facade.

use thiserror::Error;

/// Errors surfaced by [`crate::show`], [`crate::run`] and the headless API.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or texture data was rejected.
    #[error(transparent)]
    Config(#[from] cubepick_core::CubePickError),

    /// The GPU backend failed. Always fatal.
    #[error(transparent)]
    Render(#[from] cubepick_render::RenderError),

    /// The event loop could not be created or run.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// A capture could not be written.
    #[error(transparent)]
    Screenshot(#[from] cubepick_render::ScreenshotError),
}

/// A specialized Result type for cubepick operations.
pub type Result<T> = std::result::Result<T, Error>;
