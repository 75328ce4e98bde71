//! Headless rendering API for cubepick.
//!
//! Renders frames offscreen without opening a window, driving the same
//! interaction state machine as the viewer from a scripted sequence of
//! cursor and button inputs. Useful for integration tests and automated
//! screenshots.

use std::path::Path;

use cubepick_core::{
    run_frame, ButtonAction, CursorPosition, FrameClock, FrameReport, InteractionState,
    MouseButton, Options, TextureData,
};
use cubepick_render::{Capture, RenderEngine};
use pollster::FutureExt;

use crate::Result;

/// Input applied before one headless frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedFrame {
    /// Cursor in window pixels, top-left origin. `CursorPosition::NONE` when absent.
    pub cursor: CursorPosition,
    /// Button event delivered before the frame, if any.
    pub button: Option<(MouseButton, ButtonAction)>,
}

impl ScriptedFrame {
    /// A frame with the cursor at `(x, y)` and no button event.
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            cursor: CursorPosition::new(x, y),
            button: None,
        }
    }

    /// A frame without a cursor.
    pub const fn no_cursor() -> Self {
        Self {
            cursor: CursorPosition::NONE,
            button: None,
        }
    }

    /// Adds a left-button event before the frame.
    #[must_use]
    pub const fn with_button(mut self, action: ButtonAction) -> Self {
        self.button = Some((MouseButton::Left, action));
        self
    }
}

/// One rendered headless frame.
#[derive(Debug, Clone)]
pub struct HeadlessFrame {
    /// What the frame computed and drew.
    pub report: FrameReport,
    /// The visible image after the frame.
    pub capture: Capture,
}

/// Renders one frame per script entry into a `width * height` offscreen target.
///
/// The rotation angle follows the configured clock, so a frame-counter clock
/// gives reproducible images.
///
/// # Errors
///
/// Returns an error if no adapter is available, the options are invalid,
/// or any frame fails.
pub fn render_frames(
    width: u32,
    height: u32,
    options: &Options,
    script: &[ScriptedFrame],
) -> Result<Vec<HeadlessFrame>> {
    options.validate()?;
    let texture = crate::init::load_texture(options)?;
    render_frames_with_texture(width, height, options, &texture, script)
}

/// Like [`render_frames`] with explicit texture data.
pub fn render_frames_with_texture(
    width: u32,
    height: u32,
    options: &Options,
    texture: &TextureData,
    script: &[ScriptedFrame],
) -> Result<Vec<HeadlessFrame>> {
    let mut engine = RenderEngine::new_headless(width, height, options, texture).block_on()?;
    let mut interaction = InteractionState::new(options.object_id);
    let mut clock = FrameClock::new(options.clock);

    let mut frames = Vec::with_capacity(script.len());
    for step in script {
        if let Some((button, action)) = step.button {
            interaction.handle_button(button, action);
        }

        let report = run_frame(
            &mut engine,
            &mut interaction,
            clock.rotation_angle(),
            step.cursor,
            options,
        )?;
        for diagnostic in &report.diagnostics {
            log::info!("{diagnostic}");
        }
        clock.advance();

        let capture = engine.capture_visible()?;
        frames.push(HeadlessFrame { report, capture });
    }

    Ok(frames)
}

/// Renders a single frame without a cursor and returns its RGBA pixels.
///
/// # Example
/// ```no_run
/// let pixels = cubepick::render_to_image(800, 600, &cubepick::Options::default()).unwrap();
/// assert_eq!(pixels.len(), 800 * 600 * 4);
/// ```
pub fn render_to_image(width: u32, height: u32, options: &Options) -> Result<Vec<u8>> {
    let mut frames = render_frames(width, height, options, &[ScriptedFrame::no_cursor()])?;
    Ok(frames
        .pop()
        .map(|frame| frame.capture.pixels)
        .unwrap_or_default())
}

/// Renders a single frame without a cursor and saves it as PNG or JPEG.
pub fn render_to_file(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    options: &Options,
) -> Result<()> {
    let data = render_to_image(width, height, options)?;
    cubepick_render::save_image(path, &data, width, height)?;
    Ok(())
}
