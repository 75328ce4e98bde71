//! Application window and event loop management.

mod input;
mod render;

use std::sync::Arc;

use cubepick_core::{CursorPosition, FrameClock, InteractionState, Options, TextureData};
use cubepick_render::RenderEngine;
use winit::{event_loop::EventLoop, window::Window};

/// The cubepick application state.
pub struct App {
    options: Options,
    texture: TextureData,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    interaction: InteractionState,
    clock: FrameClock,
    /// Latest cursor in window pixels, `NONE` once it leaves the window.
    cursor: CursorPosition,
    close_requested: bool,
    /// First unrecoverable error; ends the event loop.
    fatal: Option<crate::Error>,
}

impl App {
    /// Creates the application. The window opens on the first resume.
    pub fn new(options: Options, texture: TextureData) -> Self {
        let interaction = InteractionState::new(options.object_id);
        let clock = FrameClock::new(options.clock);
        Self {
            options,
            texture,
            window: None,
            engine: None,
            interaction,
            clock,
            cursor: CursorPosition::NONE,
            close_requested: false,
            fatal: None,
        }
    }

    /// Records an unrecoverable error and asks the loop to stop.
    fn fail(&mut self, error: impl Into<crate::Error>) {
        let error = error.into();
        log::error!("{error}");
        self.fatal.get_or_insert(error);
        self.close_requested = true;
    }
}

/// Runs the event loop until the window closes or a frame fails.
pub fn run_app(options: Options, texture: TextureData) -> crate::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(options, texture);

    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(error) => Err(error),
        None => {
            log::info!("closed after {} frames", app.clock.frame_count());
            Ok(())
        }
    }
}
